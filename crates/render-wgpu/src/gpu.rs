use crate::error::RenderError;
use crate::mesh::{GpuModel, Vertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use solar_assets::ModelLibrary;
use solar_common::ProgramKind;
use solar_render::{Frame, FrameUniforms};
use wgpu::util::DeviceExt;

/// Draw slots reserved in the per-draw uniform arena.
const MAX_DRAW_SLOTS: u32 = 256;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    view_position: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightUniforms {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    /// constant, linear, quadratic, shininess
    attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    base_color: [f32; 4],
}

impl DrawUniforms {
    pub(crate) fn new(transform: Mat4, base_color: [f32; 4]) -> Self {
        let normal = if transform.determinant().abs() > f32::EPSILON {
            transform.inverse().transpose()
        } else {
            transform
        };
        Self {
            model: transform.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            base_color,
        }
    }
}

fn camera_uniforms(u: &FrameUniforms) -> CameraUniforms {
    CameraUniforms {
        projection: u.projection.to_cols_array_2d(),
        view: u.view.to_cols_array_2d(),
        view_position: u.view_position.extend(1.0).to_array(),
    }
}

fn light_uniforms(u: &FrameUniforms) -> LightUniforms {
    let light = &u.light;
    LightUniforms {
        position: light.position.extend(1.0).to_array(),
        ambient: light.ambient.extend(0.0).to_array(),
        diffuse: light.diffuse.extend(0.0).to_array(),
        specular: light.specular.extend(0.0).to_array(),
        attenuation: [light.constant, light.linear, light.quadratic, u.shininess],
    }
}

/// Distance between consecutive draw slots, honouring the device's dynamic
/// offset alignment.
pub(crate) fn draw_slot_stride(alignment: u32) -> u64 {
    wgpu::util::align_to(
        std::mem::size_of::<DrawUniforms>() as u64,
        alignment.max(1) as u64,
    )
}

/// wgpu-based scene renderer.
///
/// Owns one pipeline per shader program and every uploaded model. Frames are
/// drawn exactly in the order they were recorded.
pub struct WgpuRenderer {
    sun_pipeline: wgpu::RenderPipeline,
    planet_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    models: Vec<GpuModel>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        library: &ModelLibrary,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("light_buffer"),
            contents: bytemuck::bytes_of(&LightUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        // Per-draw arena, addressed with dynamic offsets.
        let draw_size = std::mem::size_of::<DrawUniforms>() as u64;
        let draw_stride = draw_slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_buffer"),
            size: draw_stride * MAX_DRAW_SLOTS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(draw_size),
                },
                count: None,
            }],
        });

        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(draw_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let sun_pipeline =
            Self::create_pipeline(device, &pipeline_layout, surface_format, ProgramKind::Sun);
        let planet_pipeline =
            Self::create_pipeline(device, &pipeline_layout, surface_format, ProgramKind::Planet);

        let models = library
            .iter()
            .map(|(handle, model)| {
                tracing::debug!(handle = handle.0, name = %model.name, "uploading model");
                GpuModel::upload(device, model)
            })
            .collect();

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            sun_pipeline,
            planet_pipeline,
            camera_buffer,
            light_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            models,
            depth_texture,
            surface_format,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
        program: ProgramKind,
    ) -> wgpu::RenderPipeline {
        let label = format!("{program}_program");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(shaders::source(program).into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::LAYOUT],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Resize the depth buffer to the new framebuffer size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    fn pipeline(&self, program: ProgramKind) -> &wgpu::RenderPipeline {
        match program {
            ProgramKind::Sun => &self.sun_pipeline,
            ProgramKind::Planet => &self.planet_pipeline,
        }
    }

    fn model(&self, draw: &solar_render::DrawCommand) -> Result<&GpuModel, RenderError> {
        self.models
            .get(draw.model.0 as usize)
            .ok_or(RenderError::UnknownModel(draw.model))
    }

    /// Render one recorded frame into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        // One slot per (draw, mesh) pair, in submission order.
        let mut slots: Vec<DrawUniforms> = Vec::new();
        for draw in &frame.draws {
            let model = self.model(draw)?;
            slots.extend(
                model
                    .meshes
                    .iter()
                    .map(|mesh| DrawUniforms::new(draw.transform, mesh.base_color)),
            );
        }
        if slots.len() > MAX_DRAW_SLOTS as usize {
            return Err(RenderError::TooManyDraws {
                needed: slots.len(),
                capacity: MAX_DRAW_SLOTS as usize,
            });
        }

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&camera_uniforms(&frame.uniforms)),
        );
        queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&light_uniforms(&frame.uniforms)),
        );
        if !slots.is_empty() {
            let stride = self.draw_stride as usize;
            let mut arena = vec![0u8; stride * slots.len()];
            for (i, slot) in slots.iter().enumerate() {
                let bytes = bytemuck::bytes_of(slot);
                arena[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
            }
            queue.write_buffer(&self.draw_buffer, 0, &arena);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = frame.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            let mut slot = 0u64;
            let mut bound: Option<ProgramKind> = None;
            for draw in &frame.draws {
                if bound != Some(draw.program) {
                    pass.set_pipeline(self.pipeline(draw.program));
                    bound = Some(draw.program);
                }
                for mesh in &self.model(draw)?.meshes {
                    let offset = (slot * self.draw_stride) as u32;
                    pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    slot += 1;
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use solar_render::PointLight;

    #[test]
    fn draw_uniforms_fit_one_slot() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 144);
        assert_eq!(draw_slot_stride(256), 256);
        assert_eq!(draw_slot_stride(64), 192);
        assert_eq!(draw_slot_stride(0), 144);
    }

    #[test]
    fn normal_matrix_undoes_uniform_scale() {
        let transform = Mat4::from_scale(Vec3::splat(0.1));
        let u = DrawUniforms::new(transform, [1.0; 4]);
        let normal = Mat4::from_cols_array_2d(&u.normal);
        assert!(normal.abs_diff_eq(Mat4::from_scale(Vec3::splat(10.0)), 1e-4));
    }

    #[test]
    fn light_block_packs_attenuation_and_shininess() {
        let uniforms = FrameUniforms {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_position: Vec3::new(0.0, 0.0, 30.0),
            light: PointLight {
                position: Vec3::new(0.0, -1.0, 0.0),
                ambient: Vec3::splat(0.25),
                diffuse: Vec3::splat(1.8),
                specular: Vec3::ONE,
                constant: 1.0,
                linear: 0.045,
                quadratic: 0.0075,
            },
            shininess: 32.0,
        };
        let light = light_uniforms(&uniforms);
        assert_eq!(light.attenuation, [1.0, 0.045, 0.0075, 32.0]);
        assert_eq!(light.position, [0.0, -1.0, 0.0, 1.0]);
        assert_eq!(camera_uniforms(&uniforms).view_position, [0.0, 0.0, 30.0, 1.0]);
    }
}
