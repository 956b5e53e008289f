//! WGSL parsing, validation and uniform metadata extraction.
//!
//! Both stages of a shader program are parsed and validated with naga at
//! compile time; a failure surfaces as [`RenderError::ShaderCompile`] with
//! the full diagnostic log.  On success the modules' global variables are
//! enumerated once and turned into the per-program uniform table:
//!
//! - struct-typed `var<uniform>` globals are **block-backed** (the frame and
//!   object constant blocks at their reserved groups) and are deliberately
//!   not part of the name-keyed table — blocks are addressed by bind group,
//!   not by uniform identity;
//! - storage-space globals mark the program as instanced;
//! - remaining `var<uniform>` globals of `f32` / `vec4` / `mat4` type and
//!   texture globals become **free uniforms**, keyed by the FNV identity of
//!   their declared name.  A sampler declared at `binding + 1` of a texture
//!   is paired with it automatically.

use std::collections::{HashMap, HashSet};

use naga::{AddressSpace, Module, ScalarKind, TypeInner, VectorSize};

use crate::error::RenderError;

use super::uniform::UniformId;

pub const FRAME_GROUP: u32 = 0;
pub const OBJECT_GROUP: u32 = 1;
pub const MATERIAL_GROUP: u32 = 2;
pub const INSTANCE_GROUP: u32 = 3;

/// Data type of a free value uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Vec4,
    Mat4,
}

impl ValueKind {
    /// Buffer allocation size — padded to uniform-friendly strides.
    pub fn buffer_size(self) -> u64 {
        match self {
            ValueKind::Float => 16,
            ValueKind::Vec4 => 16,
            ValueKind::Mat4 => 64,
        }
    }
}

/// Where a free uniform lives inside the material bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformSlot {
    Value { binding: u32, kind: ValueKind },
    Texture { binding: u32 },
}

/// One entry of the material bind group, ordered by binding index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialEntry {
    Value {
        binding: u32,
        kind: ValueKind,
        name: String,
    },
    Texture {
        binding: u32,
        name: String,
    },
    Sampler {
        binding: u32,
    },
}

impl MaterialEntry {
    pub fn binding(&self) -> u32 {
        match self {
            MaterialEntry::Value { binding, .. }
            | MaterialEntry::Texture { binding, .. }
            | MaterialEntry::Sampler { binding } => *binding,
        }
    }
}

/// Per-program uniform table, built once after validation.
#[derive(Debug, Default)]
pub struct ShaderMetadata {
    uniforms: HashMap<UniformId, UniformSlot>,
    /// Material bind group contents, sorted by binding.
    pub material: Vec<MaterialEntry>,
    pub uses_frame: bool,
    pub uses_object: bool,
    pub uses_instances: bool,
}

impl ShaderMetadata {
    /// Resolves an identity to its slot.  `None` simply means the uniform is
    /// not present in this program (e.g. stripped or never declared) — the
    /// caller treats that as a no-op, never an error.
    pub fn slot(&self, id: UniformId) -> Option<UniformSlot> {
        self.uniforms.get(&id).copied()
    }

    pub fn contains(&self, id: UniformId) -> bool {
        self.uniforms.contains_key(&id)
    }

    /// Highest bind group index this program declares, if any.
    pub fn max_group(&self) -> Option<u32> {
        let mut max = None;
        let mut bump = |g: u32| max = Some(max.map_or(g, |m: u32| m.max(g)));
        if self.uses_frame {
            bump(FRAME_GROUP);
        }
        if self.uses_object {
            bump(OBJECT_GROUP);
        }
        if !self.material.is_empty() {
            bump(MATERIAL_GROUP);
        }
        if self.uses_instances {
            bump(INSTANCE_GROUP);
        }
        max
    }
}

/// Parses and validates one WGSL stage, returning its naga module.
pub fn parse_stage(stage: &'static str, source: &str) -> Result<Module, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::ShaderCompile {
        stage,
        log: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| RenderError::ShaderCompile {
        stage,
        log: e.emit_to_string(source),
    })?;

    Ok(module)
}

/// Enumerates the resource bindings of the linked program (both stages,
/// deduplicated by `(group, binding)`).
pub fn reflect(modules: &[&Module]) -> Result<ShaderMetadata, RenderError> {
    let mut meta = ShaderMetadata::default();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();

    for module in modules {
        for (_, var) in module.global_variables.iter() {
            let Some(res) = &var.binding else {
                continue; // private / workgroup variable
            };
            if !seen.insert((res.group, res.binding)) {
                continue; // declared in both stages
            }
            let name = var.name.clone().unwrap_or_default();
            let inner = &module.types[var.ty].inner;

            match var.space {
                AddressSpace::Uniform => match inner {
                    TypeInner::Struct { .. } => match res.group {
                        // Block-backed constants are addressed by their
                        // reserved bind group, not by uniform identity.
                        FRAME_GROUP => meta.uses_frame = true,
                        OBJECT_GROUP => meta.uses_object = true,
                        group => {
                            return Err(bad_binding(&name, group, "uniform blocks belong in the frame or object group"));
                        }
                    },
                    inner => {
                        let Some(kind) = classify_value(inner) else {
                            log::debug!("uniform '{name}' has an unsupported type, not cached");
                            continue;
                        };
                        if res.group != MATERIAL_GROUP {
                            return Err(bad_binding(&name, res.group, "free uniforms belong in the material group"));
                        }
                        meta.uniforms.insert(
                            UniformId::from_name(&name),
                            UniformSlot::Value {
                                binding: res.binding,
                                kind,
                            },
                        );
                        meta.material.push(MaterialEntry::Value {
                            binding: res.binding,
                            kind,
                            name,
                        });
                    }
                },
                AddressSpace::Storage { .. } => {
                    if res.group != INSTANCE_GROUP {
                        return Err(bad_binding(&name, res.group, "storage buffers belong in the instance group"));
                    }
                    meta.uses_instances = true;
                }
                AddressSpace::Handle => match inner {
                    TypeInner::Image { .. } => {
                        if res.group != MATERIAL_GROUP {
                            return Err(bad_binding(&name, res.group, "textures belong in the material group"));
                        }
                        meta.uniforms.insert(
                            UniformId::from_name(&name),
                            UniformSlot::Texture {
                                binding: res.binding,
                            },
                        );
                        meta.material.push(MaterialEntry::Texture {
                            binding: res.binding,
                            name,
                        });
                    }
                    TypeInner::Sampler { .. } => {
                        if res.group != MATERIAL_GROUP {
                            return Err(bad_binding(&name, res.group, "samplers belong in the material group"));
                        }
                        meta.material.push(MaterialEntry::Sampler {
                            binding: res.binding,
                        });
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    meta.material.sort_by_key(|entry| entry.binding());
    Ok(meta)
}

fn classify_value(inner: &TypeInner) -> Option<ValueKind> {
    match inner {
        TypeInner::Scalar(s) if s.kind == ScalarKind::Float && s.width == 4 => {
            Some(ValueKind::Float)
        }
        TypeInner::Vector { size: VectorSize::Quad, scalar }
            if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
        {
            Some(ValueKind::Vec4)
        }
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            ..
        } => Some(ValueKind::Mat4),
        _ => None,
    }
}

fn bad_binding(name: &str, group: u32, rule: &str) -> RenderError {
    RenderError::ShaderCompile {
        stage: "link",
        log: format!("'{name}' declared in group {group}: {rule}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: &str = r#"
        struct FrameConstants {
            view_proj: mat4x4<f32>,
            light_direction: vec3<f32>,
            time: f32,
        }
        @group(0) @binding(0) var<uniform> frame: FrameConstants;
        @group(2) @binding(0) var base_color: texture_2d<f32>;
        @group(2) @binding(1) var base_sampler: sampler;
        @group(2) @binding(2) var<uniform> color: vec4<f32>;
        @group(2) @binding(3) var<uniform> brightness: f32;

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            let l = normalize(frame.light_direction);
            return textureSampleLevel(base_color, base_sampler, vec2<f32>(0.5), 0.0)
                * color * brightness * max(l.y, 0.0);
        }
    "#;

    const VS_INSTANCED: &str = r#"
        struct ObjectConstants { local_to_world: mat4x4<f32> }
        @group(1) @binding(0) var<uniform> object: ObjectConstants;
        @group(3) @binding(0) var<storage, read> instances: array<vec4<f32>>;

        @vertex
        fn vs_main(
            @location(0) position: vec3<f32>,
            @builtin(instance_index) instance: u32,
        ) -> @builtin(position) vec4<f32> {
            let offset = instances[instance].xyz;
            return object.local_to_world * vec4<f32>(position + offset, 1.0);
        }
    "#;

    fn meta_for(sources: &[&str]) -> ShaderMetadata {
        let modules: Vec<Module> = sources
            .iter()
            .map(|s| parse_stage("test", s).expect("fixture must parse"))
            .collect();
        let refs: Vec<&Module> = modules.iter().collect();
        reflect(&refs).expect("fixture must reflect")
    }

    #[test]
    fn free_uniforms_are_recorded_by_identity() {
        let meta = meta_for(&[FS]);
        assert!(matches!(
            meta.slot(UniformId::from_name("color")),
            Some(UniformSlot::Value { binding: 2, kind: ValueKind::Vec4 })
        ));
        assert!(matches!(
            meta.slot(UniformId::from_name("brightness")),
            Some(UniformSlot::Value { binding: 3, kind: ValueKind::Float })
        ));
        assert!(matches!(
            meta.slot(UniformId::from_name("base_color")),
            Some(UniformSlot::Texture { binding: 0 })
        ));
    }

    #[test]
    fn block_backed_uniforms_are_skipped() {
        let meta = meta_for(&[FS]);
        assert!(meta.uses_frame);
        // Neither the block variable nor its members are addressable.
        assert!(!meta.contains(UniformId::from_name("frame")));
        assert!(!meta.contains(UniformId::from_name("view_proj")));
    }

    #[test]
    fn absent_identity_resolves_to_none() {
        let meta = meta_for(&[FS]);
        assert!(meta.slot(UniformId::from_name("does_not_exist")).is_none());
    }

    #[test]
    fn storage_marks_the_program_instanced() {
        let meta = meta_for(&[VS_INSTANCED, FS]);
        assert!(meta.uses_instances);
        assert!(meta.uses_object);
        assert_eq!(meta.max_group(), Some(INSTANCE_GROUP));
        // The instance array itself is not a cacheable uniform.
        assert!(!meta.contains(UniformId::from_name("instances")));
    }

    #[test]
    fn material_entries_sorted_by_binding() {
        let meta = meta_for(&[FS]);
        let bindings: Vec<u32> = meta.material.iter().map(|e| e.binding()).collect();
        assert_eq!(bindings, vec![0, 1, 2, 3]);
    }

    #[test]
    fn misplaced_free_uniform_is_a_compile_error() {
        let src = r#"
            @group(0) @binding(1) var<uniform> stray: vec4<f32>;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> { return stray; }
        "#;
        let module = parse_stage("test", src).expect("parses fine");
        assert!(reflect(&[&module]).is_err());
    }

    #[test]
    fn bad_wgsl_carries_a_diagnostic_log() {
        let err = parse_stage("vertex", "fn broken( {").unwrap_err();
        match err {
            RenderError::ShaderCompile { log, .. } => assert!(!log.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
