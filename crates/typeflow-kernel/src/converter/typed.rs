//! Support checks shared by typed converters.

use crate::preferences::{ValuePreferences, conversion_target, type_weight};

use super::{ConversionError, ConversionResult, ConverterArgs, TypedRepresentationConverter};

/// Verifies that `content_type` is a declared input and that some declared
/// output satisfies `preferences`.
pub fn supports_conversion(
    content_type: &str,
    preferences: &ValuePreferences,
    inputs: &ValuePreferences,
    outputs: &ValuePreferences,
) -> ConversionResult<()> {
    if type_weight(inputs, content_type) <= 0.0
        || conversion_target(outputs, &preferences.normalized()).is_none()
    {
        return Err(ConversionError::unsupported(inputs, outputs));
    }
    Ok(())
}

/// Default `can_handle` for typed converters.
///
/// Fetches the converter's current declarations and validates the request
/// against them.
pub async fn ensure_supported<C>(converter: &C, args: &ConverterArgs) -> ConversionResult<()>
where
    C: TypedRepresentationConverter + ?Sized,
{
    let content_type = args
        .representation
        .content_type()
        .ok_or(ConversionError::MissingContentType)?;
    let inputs = converter.input_types().await?;
    let outputs = converter.output_types().await?;
    supports_conversion(content_type, &args.preferences, &inputs, &outputs)
}
