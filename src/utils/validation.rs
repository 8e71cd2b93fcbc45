use std::path::Path;
use crate::core::ConverterSettings;
use crate::utils::{ConverterResult, ValidationError};

/// Validates every input path of a batch before any work starts.
pub fn validate_inputs<P: AsRef<Path>>(paths: &[P]) -> ConverterResult<()> {
    if paths.is_empty() {
        return Err(ValidationError::EmptyBatch.into());
    }
    for path in paths {
        validate_input_path(path.as_ref())?;
    }
    Ok(())
}

/// Validates that the input path points at an existing file
pub fn validate_input_path(path: &Path) -> ConverterResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}

/// Validates converter settings
pub fn validate_settings(settings: &ConverterSettings) -> ConverterResult<()> {
    let quality = &settings.quality;
    for (name, value) in [("jpeg", quality.jpeg), ("webp", quality.webp), ("avif", quality.avif)] {
        if value == 0 || value > 100 {
            return Err(ValidationError::settings(format!(
                "Invalid {name} quality: {value}. Must be between 1 and 100"
            ))
            .into());
        }
    }

    if settings.avif_speed == 0 || settings.avif_speed > 10 {
        return Err(ValidationError::settings(format!(
            "Invalid AVIF speed: {}. Must be between 1 and 10",
            settings.avif_speed
        ))
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ConverterError;

    #[test]
    fn default_settings_are_valid() {
        assert!(validate_settings(&ConverterSettings::default()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let mut settings = ConverterSettings::default();
        settings.quality.webp = 0;
        assert!(matches!(
            validate_settings(&settings),
            Err(ConverterError::Validation(ValidationError::Settings(_)))
        ));

        let mut settings = ConverterSettings::default();
        settings.quality.jpeg = 101;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_out_of_range_avif_speed() {
        let mut settings = ConverterSettings::default();
        settings.avif_speed = 11;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn empty_batch_is_rejected() {
        let paths: Vec<&Path> = Vec::new();
        assert!(matches!(
            validate_inputs(&paths),
            Err(ConverterError::Validation(ValidationError::EmptyBatch))
        ));
    }

    #[test]
    fn directories_and_missing_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_input_path(dir.path()).is_err());
        assert!(validate_input_path(&dir.path().join("missing.png")).is_err());

        let file = dir.path().join("present.png");
        std::fs::write(&file, b"not really a png").unwrap();
        assert!(validate_input_path(&file).is_ok());
    }
}
