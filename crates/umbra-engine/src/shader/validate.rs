use super::{ShaderError, ShaderStage, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Parses and validates one expanded stage with naga and checks that it
/// exports the stage's entry point.
///
/// wgpu validates again at pipeline creation, but only once a device exists;
/// running naga here surfaces shader mistakes at material construction and
/// in tests without a GPU.
pub fn validate_wgsl(label: &str, stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        label: label.to_string(),
        stage,
        message: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| ShaderError::Validation {
        label: label.to_string(),
        stage,
        message: format!("{e:?}"),
    })?;

    let (entry, naga_stage) = match stage {
        ShaderStage::Vertex => (VERTEX_ENTRY, naga::ShaderStage::Vertex),
        ShaderStage::Fragment => (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
    };
    let exported = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == naga_stage);
    if !exported {
        return Err(ShaderError::MissingEntryPoint { label: label.to_string(), stage, entry });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_VS: &str = r#"
@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 1.0);
}
"#;

    #[test]
    fn minimal_vertex_stage_validates() {
        assert_eq!(validate_wgsl("t", ShaderStage::Vertex, MINIMAL_VS), Ok(()));
    }

    #[test]
    fn wrong_stage_entry_is_missing() {
        let err = validate_wgsl("t", ShaderStage::Fragment, MINIMAL_VS).unwrap_err();
        assert!(matches!(err, ShaderError::MissingEntryPoint { entry: "fs_main", .. }));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = validate_wgsl("t", ShaderStage::Vertex, "fn vs_main( {").unwrap_err();
        assert!(matches!(err, ShaderError::Parse { stage: ShaderStage::Vertex, .. }));
    }

    #[test]
    fn type_errors_are_validation_errors() {
        let src = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> {
    let a: f32 = 1.0;
    let b: u32 = 2u;
    return vec4<f32>(a, a, a, a) * vec4<f32>(f32(b));
}
fn broken() -> f32 {
    return 1u;
}
"#;
        let err = validate_wgsl("t", ShaderStage::Vertex, src).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Parse { .. } | ShaderError::Validation { .. }
        ));
    }
}
