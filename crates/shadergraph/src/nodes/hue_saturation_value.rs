// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shift hue and scale saturation and value of a color.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "hue_saturation_value";
/// Hue offset; 0.5 leaves the hue unchanged
pub const IN_HUE: &str = "hue";
/// Saturation multiplier
pub const IN_SATURATION: &str = "saturation";
/// Value multiplier
pub const IN_VALUE: &str = "value";
/// Blend between the input and the adjusted color
pub const IN_FAC: &str = "fac";
/// Color to adjust
pub const IN_COLOR: &str = "color";
/// Adjusted color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_HUE, DataType::Float).with_default(0.5f32))
        .with_input(Socket::new(IN_SATURATION, DataType::Float).with_default(1.0f32))
        .with_input(Socket::new(IN_VALUE, DataType::Float).with_default(1.0f32))
        .with_input(
            Socket::new(IN_FAC, DataType::Float)
                .with_default(1.0f32)
                .with_range(0.0, 1.0),
        )
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
        .with_module("color")
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let color = e.input(IN_COLOR)?;
    let fac = e.input(IN_FAC)?;
    let hsv = e.local_var("hsv");
    let adjusted = e.local_var("adjusted");

    Ok(format!(
        "vec3 {hsv} = rgb_to_hsv({color});\n\
         {hsv}.x = mod({hsv}.x + {hue} + 0.5, 1.0);\n\
         {hsv}.y = clamp({hsv}.y * {saturation}, 0.0, 1.0);\n\
         {hsv}.z *= {value};\n\
         vec3 {adjusted} = hsv_to_rgb({hsv});\n\
         {decl} = max(mix({color}, {adjusted}, {fac}), vec3(0.0));\n",
        hue = e.input(IN_HUE)?,
        saturation = e.input(IN_SATURATION)?,
        value = e.input(IN_VALUE)?,
        decl = e.output_declaration(OUT_COLOR)?,
    ))
}
