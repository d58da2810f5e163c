// SPDX-License-Identifier: MIT OR Apache-2.0
//! Combine a surface color with an emissive contribution.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::{Socket, SocketEnum};
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "emission";
/// Surface color
pub const IN_COLOR: &str = "color";
/// Emitted color
pub const IN_EMISSION_COLOR: &str = "emission_color";
/// Blend between the surface and the emissive result
pub const IN_EMISSION_ALPHA: &str = "emission_alpha";
/// Material base color
pub const IN_BASE_COLOR: &str = "base_color";
/// Emission strength
pub const IN_EMISSION_FACTOR: &str = "emission_factor";
/// How the emission is applied
pub const IN_EMISSION_MODE: &str = "emission_mode";
/// Shaded color
pub const OUT_COLOR: &str = "color";
/// Effective emission
pub const OUT_EMISSION_COLOR: &str = "emission_color";

crate::socket_enum! {
    /// Emission application mode, passed through to `apply_emission_color`
    pub enum EmissionMode {
        /// Added on top of the surface
        Additive = 0 => "additive",
        /// Multiplied with the base color
        Multiply = 1 => "multiply",
        /// Replaces the surface
        Replace = 2 => "replace",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Shader, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_input(Socket::new(IN_EMISSION_COLOR, DataType::Color))
        .with_input(
            Socket::new(IN_EMISSION_ALPHA, DataType::Float)
                .with_default(1.0f32)
                .with_range(0.0, 1.0),
        )
        .with_input(Socket::new(IN_BASE_COLOR, DataType::Color))
        .with_input(Socket::new(IN_EMISSION_FACTOR, DataType::Float).with_default(1.0f32))
        .with_input(Socket::enumeration(IN_EMISSION_MODE, EmissionMode::Additive))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_EMISSION_COLOR, DataType::Color))
        .with_module("emission")
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let mode: EmissionMode = e.constant_enum(IN_EMISSION_MODE)?;
    let color = e.input(IN_COLOR)?;
    let emission = e.input(IN_EMISSION_COLOR)?;
    let factor = e.input(IN_EMISSION_FACTOR)?;
    let alpha = e.input(IN_EMISSION_ALPHA)?;
    let emitted = e.local_var("emitted");

    Ok(format!(
        "vec3 {emitted} = apply_emission_color(vec4({color}, 1.0), vec4({emission} * {factor}, 1.0), vec4({base}, 1.0), {mode}).rgb;\n\
         {out_color} = mix({color}, {emitted}, {alpha});\n\
         {out_emission} = {emission} * {factor} * {alpha};\n",
        base = e.input(IN_BASE_COLOR)?,
        mode = mode.to_raw(),
        out_color = e.output_declaration(OUT_COLOR)?,
        out_emission = e.output_declaration(OUT_EMISSION_COLOR)?,
    ))
}
