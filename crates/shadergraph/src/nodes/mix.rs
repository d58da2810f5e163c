// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blend two colors.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::nodes::clamp_statement;
use crate::socket::{Socket, SocketEnum};
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "mix";
/// Blend mode
pub const IN_TYPE: &str = "type";
/// Blend factor
pub const IN_FAC: &str = "fac";
/// Clamp the result to [0, 1]
pub const IN_CLAMP: &str = "clamp";
/// Base color
pub const IN_COLOR1: &str = "color1";
/// Blended color
pub const IN_COLOR2: &str = "color2";
/// Result
pub const OUT_COLOR: &str = "color";

crate::socket_enum! {
    /// Blend mode; each maps to a `<name>_color` function of the `mix` module
    pub enum MixType {
        /// Linear interpolation
        Mix = 0 => "mix",
        /// Add
        Add = 1 => "add",
        /// Multiply
        Multiply = 2 => "multiply",
        /// Screen
        Screen = 3 => "screen",
        /// Overlay
        Overlay = 4 => "overlay",
        /// Subtract
        Subtract = 5 => "subtract",
        /// Divide
        Divide = 6 => "divide",
        /// Absolute difference
        Difference = 7 => "difference",
        /// Component-wise minimum
        Darken = 8 => "darken",
        /// Component-wise maximum
        Lighten = 9 => "lighten",
        /// Color dodge
        Dodge = 10 => "dodge",
        /// Color burn
        Burn = 11 => "burn",
        /// Hue of color2
        Hue = 12 => "hue",
        /// Saturation of color2
        Saturation = 13 => "saturation",
        /// Value of color2
        Value = 14 => "value",
        /// Hue and saturation of color2
        Color = 15 => "color",
        /// Soft light
        SoftLight = 16 => "soft_light",
        /// Linear light
        LinearLight = 17 => "linear_light",
        /// Exclusion
        Exclusion = 18 => "exclusion",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::enumeration(IN_TYPE, MixType::Mix))
        .with_input(
            Socket::new(IN_FAC, DataType::Float)
                .with_default(0.5f32)
                .with_range(0.0, 1.0),
        )
        .with_input(Socket::new(IN_CLAMP, DataType::Boolean))
        .with_input(Socket::new(IN_COLOR1, DataType::Color))
        .with_input(Socket::new(IN_COLOR2, DataType::Color))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
        .with_module("mix")
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let mix_type: MixType = e.constant_enum(IN_TYPE)?;
    let mut code = format!(
        "{} = {}_color({}, {}, {});\n",
        e.output_declaration(OUT_COLOR)?,
        mix_type.name(),
        e.input(IN_COLOR1)?,
        e.input(IN_COLOR2)?,
        e.input(IN_FAC)?
    );
    code.push_str(&clamp_statement(e, IN_CLAMP, &e.output_var(OUT_COLOR)?)?);
    Ok(code)
}
