//! wgpu Scene Renderer
//!
//! [`SceneRenderer`] backed by wgpu. Three pipelines share one frame bind
//! group (camera block + dynamically offset per-draw block):
//!
//! - points: one instanced quad per star, additive, depth-tested without writes
//! - mesh: instanced triangle meshes, opaque, lit or unlit per material
//! - disk: the accretion ring, additive and double-sided, with its own
//!   time/color block in group 1
//!
//! Disposal drops buffers instead of destroying them; wgpu keeps a buffer
//! alive until every submission that references it has finished.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use log::{debug, warn};
use winit::window::Window;

use super::backend::{
    FrameView, GeometryData, GeometryId, MaterialDesc, MaterialId, ResourceIds, ResourceStats,
    SceneRenderer,
};
use super::gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
use super::shaders;
use super::uniforms::{
    CameraUniforms, DRAW_UNIFORM_STRIDE, DiskUniforms, DrawUniforms, shading,
};
use super::vertex::{InstanceTransform, MeshData, MeshVertex, PointVertex};
use crate::error::{ExplorerError, ExplorerResult};

/// Background clear color (deep space).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Initial number of per-draw uniform slots.
const INITIAL_DRAW_SLOTS: u64 = 16;

enum GpuGeometry {
    Points {
        buffer: wgpu::Buffer,
        count: u32,
    },
    Mesh {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
        instance_buffer: wgpu::Buffer,
        instance_count: u32,
    },
}

struct GpuMaterial {
    desc: MaterialDesc,
    disk: Option<DiskBinding>,
}

struct DiskBinding {
    uniforms: DiskUniforms,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draw order bucket: opaque first, then additive passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PassKind {
    Mesh,
    Disk,
    Points,
}

pub struct WgpuRenderer {
    gpu: GpuContext,
    ids: ResourceIds,
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, GpuMaterial>,

    camera_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    draw_slots: u64,
    frame_layout: wgpu::BindGroupLayout,
    frame_bind_group: wgpu::BindGroup,
    disk_layout: wgpu::BindGroupLayout,

    point_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    disk_pipeline: wgpu::RenderPipeline,

    staging: Vec<u8>,
}

impl WgpuRenderer {
    /// Acquire the GPU for `window` and build every pipeline.
    pub async fn new(window: Arc<Window>, config: GpuContextConfig) -> ExplorerResult<Self> {
        let gpu = GpuContext::new(window, config).await?;
        Ok(Self::from_context(gpu))
    }

    pub fn from_context(gpu: GpuContext) -> Self {
        let device = &gpu.device;

        let camera_buffer =
            gpu.create_uniform_buffer("Camera Uniform Buffer", &CameraUniforms::default());
        let draw_slots = INITIAL_DRAW_SLOTS;
        let draw_buffer =
            gpu.create_empty_uniform_buffer("Draw Uniform Buffer", draw_slots * DRAW_UNIFORM_STRIDE);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                // Binding 0: camera + lighting
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Binding 1: per-draw block, dynamic offset
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<DrawUniforms>() as u64
                        ),
                    },
                    count: None,
                },
            ],
        });

        let disk_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Disk Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group =
            Self::create_frame_bind_group(device, &frame_layout, &camera_buffer, &draw_buffer);

        let format = gpu.format();
        let point_pipeline = Self::create_point_pipeline(device, format, &frame_layout);
        let mesh_pipeline = Self::create_mesh_pipeline(device, format, &frame_layout);
        let disk_pipeline = Self::create_disk_pipeline(device, format, &frame_layout, &disk_layout);

        Self {
            gpu,
            ids: ResourceIds::new(),
            geometries: HashMap::new(),
            materials: HashMap::new(),
            camera_buffer,
            draw_buffer,
            draw_slots,
            frame_layout,
            frame_bind_group,
            disk_layout,
            point_pipeline,
            mesh_pipeline,
            disk_pipeline,
            staging: Vec::new(),
        }
    }

    fn create_frame_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        draw_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: draw_buffer,
                        offset: 0,
                        size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                    }),
                },
            ],
        })
    }

    // ========================================================================
    // PIPELINES
    // ========================================================================

    fn mesh_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 24,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 40,
                shader_location: 3,
            },
        ];
        const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 4,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 5,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 32,
                shader_location: 6,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 48,
                shader_location: 7,
            },
        ];
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceTransform>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRIBUTES,
            },
        ]
    }

    /// Additive blending: result = src * srcAlpha + dst
    fn additive_blend() -> wgpu::BlendState {
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        }
    }

    fn depth_state(write: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    fn double_sided() -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        }
    }

    fn create_point_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POINTS_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[frame_layout],
            push_constant_ranges: &[],
        });
        const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
        ];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                // One star per instance; the quad corners come from vertex_index.
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PointVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &POINT_ATTRIBUTES,
                }],
            },
            primitive: Self::double_sided(),
            depth_stencil: Some(Self::depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(Self::additive_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        })
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[frame_layout],
            push_constant_ranges: &[],
        });
        let buffers = Self::mesh_buffer_layouts();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &buffers,
            },
            primitive: Self::double_sided(),
            depth_stencil: Some(Self::depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        })
    }

    fn create_disk_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        disk_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Accretion Disk Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::DISK_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Disk Pipeline Layout"),
            bind_group_layouts: &[frame_layout, disk_layout],
            push_constant_ranges: &[],
        });
        let buffers = Self::mesh_buffer_layouts();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Disk Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &buffers,
            },
            primitive: Self::double_sided(),
            depth_stencil: Some(Self::depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(Self::additive_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        })
    }

    // ========================================================================
    // UPLOAD
    // ========================================================================

    fn upload_mesh(&self, mesh: &MeshData, instances: &[InstanceTransform]) -> GpuGeometry {
        GpuGeometry::Mesh {
            vertex_buffer: self.gpu.create_vertex_buffer("Mesh Vertex Buffer", &mesh.vertices),
            index_buffer: self.gpu.create_index_buffer("Mesh Index Buffer", &mesh.indices),
            index_count: mesh.indices.len() as u32,
            instance_buffer: self
                .gpu
                .create_vertex_buffer("Mesh Instance Buffer", instances),
            instance_count: instances.len() as u32,
        }
    }

    /// Grow the per-draw uniform buffer to hold at least `draws` slots.
    fn ensure_draw_slots(&mut self, draws: u64) {
        if draws <= self.draw_slots {
            return;
        }
        let slots = draws.next_power_of_two();
        debug!("growing draw uniform buffer to {slots} slots");
        self.draw_buffer = self
            .gpu
            .create_empty_uniform_buffer("Draw Uniform Buffer", slots * DRAW_UNIFORM_STRIDE);
        self.frame_bind_group = Self::create_frame_bind_group(
            &self.gpu.device,
            &self.frame_layout,
            &self.camera_buffer,
            &self.draw_buffer,
        );
        self.draw_slots = slots;
    }
}

fn draw_uniforms(desc: &MaterialDesc, model: glam::Mat4) -> (PassKind, DrawUniforms) {
    let mut u = DrawUniforms {
        model: model.to_cols_array_2d(),
        ..Default::default()
    };
    let pass = match desc {
        MaterialDesc::PointSprites { size } => {
            u.params = [shading::UNLIT, *size, 1.0, 0.0];
            PassKind::Points
        }
        MaterialDesc::Standard {
            color,
            roughness,
            metalness,
        } => {
            u.color = [color[0], color[1], color[2], 1.0];
            u.params = [shading::LIT, 0.0, *roughness, *metalness];
            PassKind::Mesh
        }
        MaterialDesc::Basic { color } => {
            u.color = [color[0], color[1], color[2], 1.0];
            PassKind::Mesh
        }
        MaterialDesc::AccretionDisk { .. } => PassKind::Disk,
    };
    (pass, u)
}

impl SceneRenderer for WgpuRenderer {
    fn create_geometry(&mut self, data: &GeometryData) -> GeometryId {
        let id = self.ids.next_geometry();
        let geometry = match data {
            GeometryData::Points(points) => GpuGeometry::Points {
                buffer: self.gpu.create_vertex_buffer("Point Instance Buffer", points),
                count: points.len() as u32,
            },
            GeometryData::Mesh(mesh) => self.upload_mesh(mesh, &[InstanceTransform::IDENTITY]),
            GeometryData::InstancedMesh { mesh, instances } => {
                let transforms: Vec<InstanceTransform> =
                    instances.iter().map(|m| InstanceTransform::from(*m)).collect();
                self.upload_mesh(mesh, &transforms)
            }
        };
        self.geometries.insert(id, geometry);
        id
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId {
        let id = self.ids.next_material();
        let disk = match desc {
            MaterialDesc::AccretionDisk {
                inner_color,
                outer_color,
            } => {
                let uniforms = DiskUniforms::new(*inner_color, *outer_color);
                let buffer = self.gpu.create_uniform_buffer("Disk Uniform Buffer", &uniforms);
                let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Disk Bind Group"),
                    layout: &self.disk_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                Some(DiskBinding {
                    uniforms,
                    buffer,
                    bind_group,
                })
            }
            _ => None,
        };
        self.materials.insert(
            id,
            GpuMaterial {
                desc: desc.clone(),
                disk,
            },
        );
        id
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        if self.geometries.remove(&id).is_none() {
            debug!("dispose of unknown geometry {id:?} ignored");
        }
    }

    fn dispose_material(&mut self, id: MaterialId) {
        if self.materials.remove(&id).is_none() {
            debug!("dispose of unknown material {id:?} ignored");
        }
    }

    fn set_disk_time(&mut self, material: MaterialId, time: f32) {
        if let Some(disk) = self
            .materials
            .get_mut(&material)
            .and_then(|m| m.disk.as_mut())
        {
            disk.uniforms.time = time;
            self.gpu
                .queue
                .write_buffer(&disk.buffer, 0, bytemuck::bytes_of(&disk.uniforms));
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn surface_size(&self) -> (u32, u32) {
        self.gpu.dimensions()
    }

    fn render(&mut self, frame: &FrameView<'_>) -> ExplorerResult<()> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(ExplorerError::RenderFailed("out of GPU memory".to_string()));
            }
            Err(e) => {
                warn!("surface error: {e:?}; skipping frame");
                return Ok(());
            }
        };

        // Resolve draws against live resources; stale ids are skipped.
        let mut ordered: Vec<(PassKind, usize, DrawUniforms)> = Vec::with_capacity(frame.draws.len());
        for (i, draw) in frame.draws.iter().enumerate() {
            let (Some(_), Some(material)) = (
                self.geometries.get(&draw.geometry),
                self.materials.get(&draw.material),
            ) else {
                continue;
            };
            let (pass, uniforms) = draw_uniforms(&material.desc, draw.model);
            ordered.push((pass, i, uniforms));
        }
        ordered.sort_by_key(|(pass, i, _)| (*pass, *i));

        self.ensure_draw_slots(ordered.len().max(1) as u64);

        let camera = CameraUniforms::new(
            frame.view,
            frame.projection,
            frame.camera_position,
            self.gpu.dimensions(),
        );
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera));

        self.staging.clear();
        self.staging
            .resize(ordered.len() * DRAW_UNIFORM_STRIDE as usize, 0);
        for (slot, (_, _, uniforms)) in ordered.iter().enumerate() {
            let start = slot * DRAW_UNIFORM_STRIDE as usize;
            let bytes = bytemuck::bytes_of(uniforms);
            self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !self.staging.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.draw_buffer, 0, &self.staging);
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (slot, (kind, index, _)) in ordered.iter().enumerate() {
                let draw = &frame.draws[*index];
                let (Some(geometry), Some(material)) = (
                    self.geometries.get(&draw.geometry),
                    self.materials.get(&draw.material),
                ) else {
                    continue;
                };
                let offset = (slot as u64 * DRAW_UNIFORM_STRIDE) as u32;

                match (kind, geometry) {
                    (PassKind::Points, GpuGeometry::Points { buffer, count }) => {
                        if *count == 0 {
                            continue;
                        }
                        pass.set_pipeline(&self.point_pipeline);
                        pass.set_bind_group(0, &self.frame_bind_group, &[offset]);
                        pass.set_vertex_buffer(0, buffer.slice(..));
                        pass.draw(0..6, 0..*count);
                    }
                    (
                        PassKind::Mesh | PassKind::Disk,
                        GpuGeometry::Mesh {
                            vertex_buffer,
                            index_buffer,
                            index_count,
                            instance_buffer,
                            instance_count,
                        },
                    ) => {
                        if *index_count == 0 || *instance_count == 0 {
                            continue;
                        }
                        if *kind == PassKind::Disk {
                            let Some(disk) = material.disk.as_ref() else {
                                continue;
                            };
                            pass.set_pipeline(&self.disk_pipeline);
                            pass.set_bind_group(1, &disk.bind_group, &[]);
                        } else {
                            pass.set_pipeline(&self.mesh_pipeline);
                        }
                        pass.set_bind_group(0, &self.frame_bind_group, &[offset]);
                        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        pass.set_vertex_buffer(1, instance_buffer.slice(..));
                        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*index_count, 0, 0..*instance_count);
                    }
                    _ => {
                        warn!(
                            "material {:?} does not fit geometry {:?}; draw skipped",
                            draw.material, draw.geometry
                        );
                    }
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resource_stats(&self) -> ResourceStats {
        ResourceStats {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
        }
    }
}
