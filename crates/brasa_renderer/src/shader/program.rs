//! Compiled shader program: two WGSL stages, the uniform binding cache and
//! a pipeline cache keyed by target state.
//!
//! A program is immutable after creation in the GL sense — stages and the
//! uniform table never change — but it owns mutable *binding* state: the
//! small per-uniform buffers, the currently assigned textures, and the lazy
//! material bind group rebuilt when an assignment changes.
//!
//! All `set_*` calls resolve the identity through the metadata table built
//! at compile time; an identity that is not present in this program is a
//! silent no-op, never an error — shaders are allowed to omit uniforms they
//! don't use.

use std::collections::HashMap;

use glam::{Mat4, Vec4};

use crate::context::GpuDefaults;
use crate::error::RenderError;
use crate::graph::targets::TargetState;
use crate::geometry::Vertex;
use crate::resources::buffer;
use crate::resources::texture::Texture;

use super::layouts::SharedLayouts;
use super::reflect::{
    self, MaterialEntry, ShaderMetadata, UniformSlot, ValueKind, FRAME_GROUP, INSTANCE_GROUP,
    MATERIAL_GROUP, OBJECT_GROUP,
};
use super::uniform::UniformId;

pub struct ShaderProgram {
    vs_module: wgpu::ShaderModule,
    fs_module: wgpu::ShaderModule,
    metadata: ShaderMetadata,
    /// One small buffer per free value uniform, keyed by binding.
    value_buffers: HashMap<u32, wgpu::Buffer>,
    /// Currently assigned texture views/samplers, keyed by texture binding.
    bound_textures: HashMap<u32, (wgpu::TextureView, wgpu::Sampler)>,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    material_dirty: bool,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<TargetState, wgpu::RenderPipeline>,
}

impl ShaderProgram {
    /// Compiles a vertex and a fragment stage.  Either stage failing to
    /// parse or validate aborts with the compiler log; on success the
    /// uniform metadata is extracted immediately and the binding state is
    /// initialised (unassigned textures fall back to the context's white
    /// placeholder).
    pub fn compile(
        device: &wgpu::Device,
        layouts: &SharedLayouts,
        defaults: &GpuDefaults,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, RenderError> {
        let vs_naga = reflect::parse_stage("vertex", vertex_src)?;
        let fs_naga = reflect::parse_stage("fragment", fragment_src)?;
        let metadata = reflect::reflect(&[&vs_naga, &fs_naga])?;

        // naga accepted both stages; hand the sources to wgpu for backend
        // compilation.
        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vertex Stage"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Fragment Stage"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let material_layout = create_material_layout(device, &metadata);

        let mut value_buffers = HashMap::new();
        for entry in &metadata.material {
            if let MaterialEntry::Value { binding, kind, name } = entry {
                value_buffers.insert(
                    *binding,
                    buffer::create_uniform_sized(device, name, kind.buffer_size()),
                );
            }
        }

        let bound_textures = HashMap::new();
        let material_bind_group = create_material_bind_group(
            device,
            &material_layout,
            &metadata,
            &value_buffers,
            &bound_textures,
            defaults,
        );

        let pipeline_layout = create_pipeline_layout(device, layouts, &material_layout, &metadata);

        Ok(Self {
            vs_module,
            fs_module,
            metadata,
            value_buffers,
            bound_textures,
            material_layout,
            material_bind_group,
            material_dirty: false,
            pipeline_layout,
            pipelines: HashMap::new(),
        })
    }

    pub fn metadata(&self) -> &ShaderMetadata {
        &self.metadata
    }

    /// Whether this program consumes the per-instance storage array.
    pub fn is_instanced(&self) -> bool {
        self.metadata.uses_instances
    }

    pub fn set_float(&self, queue: &wgpu::Queue, id: UniformId, value: f32) {
        self.write_value(queue, id, ValueKind::Float, bytemuck::bytes_of(&value));
    }

    pub fn set_vector(&self, queue: &wgpu::Queue, id: UniformId, value: Vec4) {
        let raw = value.to_array();
        self.write_value(queue, id, ValueKind::Vec4, bytemuck::bytes_of(&raw));
    }

    pub fn set_matrix(&self, queue: &wgpu::Queue, id: UniformId, value: Mat4) {
        let raw = value.to_cols_array();
        self.write_value(queue, id, ValueKind::Mat4, bytemuck::bytes_of(&raw));
    }

    /// Assigns `texture` (view + sampler) to the reflected slot of `id`.
    /// The material bind group is rebuilt lazily on the next refresh.
    pub fn set_texture(&mut self, id: UniformId, texture: &Texture) {
        match self.metadata.slot(id) {
            Some(UniformSlot::Texture { binding }) => {
                self.bound_textures
                    .insert(binding, (texture.view.clone(), texture.sampler.clone()));
                self.material_dirty = true;
            }
            Some(UniformSlot::Value { .. }) => {
                log::warn!("set_texture on a value uniform, ignored");
            }
            None => {} // uniform not present in this program
        }
    }

    fn write_value(&self, queue: &wgpu::Queue, id: UniformId, kind: ValueKind, bytes: &[u8]) {
        match self.metadata.slot(id) {
            Some(UniformSlot::Value { binding, kind: declared }) if declared == kind => {
                if let Some(buf) = self.value_buffers.get(&binding) {
                    queue.write_buffer(buf, 0, bytes);
                }
            }
            Some(_) => log::warn!("uniform type mismatch for {id:?}, ignored"),
            None => {} // uniform not present in this program
        }
    }

    /// Returns the material bind group, rebuilding it first if a texture
    /// assignment changed since the last refresh.
    pub fn material_bind_group(
        &mut self,
        device: &wgpu::Device,
        defaults: &GpuDefaults,
    ) -> wgpu::BindGroup {
        if self.material_dirty {
            self.material_bind_group = create_material_bind_group(
                device,
                &self.material_layout,
                &self.metadata,
                &self.value_buffers,
                &self.bound_textures,
                defaults,
            );
            self.material_dirty = false;
        }
        self.material_bind_group.clone()
    }

    /// Pipeline compiled for the given target state, cached per distinct
    /// state so steady-state frames never recompile.
    pub fn pipeline(&mut self, device: &wgpu::Device, state: &TargetState) -> wgpu::RenderPipeline {
        if let Some(pipeline) = self.pipelines.get(state) {
            return pipeline.clone();
        }

        let targets: Vec<Option<wgpu::ColorTargetState>> = state
            .color_formats
            .iter()
            .map(|format| {
                Some(wgpu::ColorTargetState {
                    format: *format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shader Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.vs_module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.fs_module,
                entry_point: Some("fs_main"),
                targets: &targets,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: state.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: state.depth_write,
                depth_compare: state.depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipelines.insert(state.clone(), pipeline.clone());
        pipeline
    }
}

fn create_material_layout(
    device: &wgpu::Device,
    metadata: &ShaderMetadata,
) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = metadata
        .material
        .iter()
        .map(|entry| match entry {
            MaterialEntry::Value { binding, .. } => wgpu::BindGroupLayoutEntry {
                binding: *binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            MaterialEntry::Texture { binding, .. } => wgpu::BindGroupLayoutEntry {
                binding: *binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            MaterialEntry::Sampler { binding } => wgpu::BindGroupLayoutEntry {
                binding: *binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        })
        .collect();

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Layout"),
        entries: &entries,
    })
}

fn create_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    metadata: &ShaderMetadata,
    value_buffers: &HashMap<u32, wgpu::Buffer>,
    bound_textures: &HashMap<u32, (wgpu::TextureView, wgpu::Sampler)>,
    defaults: &GpuDefaults,
) -> wgpu::BindGroup {
    let entries: Vec<wgpu::BindGroupEntry> = metadata
        .material
        .iter()
        .map(|entry| match entry {
            MaterialEntry::Value { binding, .. } => wgpu::BindGroupEntry {
                binding: *binding,
                resource: value_buffers[binding].as_entire_binding(),
            },
            MaterialEntry::Texture { binding, .. } => wgpu::BindGroupEntry {
                binding: *binding,
                resource: wgpu::BindingResource::TextureView(
                    bound_textures
                        .get(binding)
                        .map(|(view, _)| view)
                        .unwrap_or(&defaults.white_texture.view),
                ),
            },
            // A sampler at binding b is paired with the texture at b - 1.
            MaterialEntry::Sampler { binding } => wgpu::BindGroupEntry {
                binding: *binding,
                resource: wgpu::BindingResource::Sampler(
                    binding
                        .checked_sub(1)
                        .and_then(|tex| bound_textures.get(&tex))
                        .map(|(_, sampler)| sampler)
                        .unwrap_or(&defaults.white_texture.sampler),
                ),
            },
        })
        .collect();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Material Bind Group"),
        layout,
        entries: &entries,
    })
}

fn create_pipeline_layout(
    device: &wgpu::Device,
    layouts: &SharedLayouts,
    material_layout: &wgpu::BindGroupLayout,
    metadata: &ShaderMetadata,
) -> wgpu::PipelineLayout {
    let mut groups: Vec<&wgpu::BindGroupLayout> = Vec::new();
    if let Some(max_group) = metadata.max_group() {
        for group in 0..=max_group {
            groups.push(match group {
                FRAME_GROUP => layouts.frame.as_ref(),
                OBJECT_GROUP => layouts.object.as_ref(),
                MATERIAL_GROUP => material_layout,
                INSTANCE_GROUP => layouts.instances.as_ref(),
                _ => unreachable!("reflection rejects groups above {INSTANCE_GROUP}"),
            });
        }
    }
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Shader Pipeline Layout"),
        bind_group_layouts: &groups,
        push_constant_ranges: &[],
    })
}
