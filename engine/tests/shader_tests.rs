//! Shader Tests - WGSL Parsing and Validation
//!
//! Every embedded shader must parse and validate with naga, and expose the
//! entry points the pipelines are built with.

use naga::ShaderStage;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use cosmic_explorer_engine::render::shaders;
use cosmic_explorer_engine::render::uniforms::{CameraUniforms, DiskUniforms, DrawUniforms};

fn parse(name: &str, source: &str) -> naga::Module {
    match naga::front::wgsl::parse_str(source) {
        Ok(module) => module,
        Err(e) => panic!("{name} failed to parse:\n{}", e.emit_to_string(source)),
    }
}

#[test]
fn test_all_shaders_validate() {
    for (name, source) in shaders::ALL {
        let module = parse(name, source);
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        if let Err(e) = validator.validate(&module) {
            panic!("{name} failed validation: {e:?}");
        }
    }
}

#[test]
fn test_entry_points_present() {
    for (name, source) in shaders::ALL {
        let module = parse(name, source);
        let has = |entry: &str, stage: ShaderStage| {
            module
                .entry_points
                .iter()
                .any(|ep| ep.name == entry && ep.stage == stage)
        };
        assert!(has("vs_main", ShaderStage::Vertex), "{name} lacks vs_main");
        assert!(has("fs_main", ShaderStage::Fragment), "{name} lacks fs_main");
    }
}

#[test]
fn test_uniform_block_sizes_match_wgsl() {
    let module = parse("points.wgsl", shaders::POINTS_WGSL);
    let size_of = |type_name: &str| {
        module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some(type_name))
            .map(|(_, ty)| ty.inner.size(module.to_ctx()))
    };
    assert_eq!(
        size_of("Camera"),
        Some(std::mem::size_of::<CameraUniforms>() as u32)
    );
    assert_eq!(size_of("Draw"), Some(std::mem::size_of::<DrawUniforms>() as u32));

    let disk = parse("disk.wgsl", shaders::DISK_WGSL);
    let disk_size = disk
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Disk"))
        .map(|(_, ty)| ty.inner.size(disk.to_ctx()));
    assert_eq!(disk_size, Some(std::mem::size_of::<DiskUniforms>() as u32));
}
