//! wgpu implementation of [`RenderBackend`].
//!
//! Owns the render context, the instanced sphere pipeline, the camera
//! uniform and the depth attachment. Draws are only accepted between
//! [`WgpuBackend::begin_frame`] and [`WgpuBackend::end_frame`]; the first
//! pass of a frame clears color and depth, later passes load them.

use wgpu::util::DeviceExt;

use super::{
    backend::{
        AttributeSlot, BufferRole, DrawCall, RenderBackend, INSTANCE_ATTRIBUTES,
        INSTANCE_STRIDE, VERTEX_ATTRIBUTES, VERTEX_STRIDE,
    },
    RenderError,
};
use crate::{
    camera::core::CameraUniform,
    gpu::{
        dynamic_buffer::DynamicBuffer, render_context::RenderContext,
        texture::DepthTexture,
    },
};

/// A GPU buffer tagged with the role it was created for.
pub struct WgpuBuffer {
    role: BufferRole,
    inner: DynamicBuffer,
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    cleared: bool,
}

/// Renders instanced spheres into a window surface.
pub struct WgpuBackend {
    context: RenderContext,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth: DepthTexture,
    clear_color: wgpu::Color,
    frame: Option<Frame>,
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

fn vertex_attributes(slots: &[AttributeSlot]) -> Vec<wgpu::VertexAttribute> {
    slots
        .iter()
        .map(|slot| wgpu::VertexAttribute {
            format: vertex_format(slot.components),
            offset: slot.offset,
            shader_location: slot.location,
        })
        .collect()
}

fn buffer_usage(role: BufferRole) -> wgpu::BufferUsages {
    match role {
        BufferRole::Vertex | BufferRole::Instance => wgpu::BufferUsages::VERTEX,
        BufferRole::Index => wgpu::BufferUsages::INDEX,
    }
}

fn create_pipeline(
    context: &RenderContext,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = context.device.create_shader_module(wgpu::include_wgsl!(
        "../../assets/shaders/instanced_sphere.wgsl"
    ));

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Instanced Sphere Pipeline Layout"),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        },
    );

    let vertex_attrs = vertex_attributes(&VERTEX_ATTRIBUTES);
    let instance_attrs = vertex_attributes(&INSTANCE_ATTRIBUTES);
    let buffers = [
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &vertex_attrs,
        },
        wgpu::VertexBufferLayout {
            array_stride: INSTANCE_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &instance_attrs,
        },
    ];

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Instanced Sphere Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthTexture::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

impl WgpuBackend {
    /// Build the pipeline and camera resources on top of `context`.
    pub fn new(context: RenderContext, clear_color: [f32; 3]) -> Self {
        let uniform = CameraUniform::new();
        let camera_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Camera Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                });

        let camera_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let camera_bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Camera Bind Group"),
                    layout: &camera_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: camera_buffer.as_entire_binding(),
                    }],
                });

        let pipeline = create_pipeline(&context, &camera_layout);
        let (width, height) = context.size();
        let depth = DepthTexture::new(&context.device, width, height);

        Self {
            context,
            pipeline,
            camera_buffer,
            camera_bind_group,
            depth,
            clear_color: wgpu::Color {
                r: f64::from(clear_color[0]),
                g: f64::from(clear_color[1]),
                b: f64::from(clear_color[2]),
                a: 1.0,
            },
            frame: None,
        }
    }

    /// The underlying render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Upload camera and shading parameters for the next draws.
    pub fn update_camera(&self, uniform: &CameraUniform) {
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(uniform),
        );
    }

    /// Resize the surface and depth attachment. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            self.depth = DepthTexture::new(&self.context.device, width, height);
        }
    }

    /// Reconfigure the surface after it was lost or outdated.
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// Acquire the next surface texture and start recording.
    ///
    /// # Errors
    ///
    /// Propagates [`wgpu::SurfaceError`] from texture acquisition.
    pub fn begin_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.frame.is_some() {
            return Ok(());
        }
        let surface_texture = self.context.get_next_frame()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(Frame {
            surface_texture,
            view,
            encoder: self.context.create_encoder(),
            cleared: false,
        });
        Ok(())
    }

    /// Submit the recorded passes and present.
    ///
    /// A frame with no draws still clears to the background color.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoActiveFrame`] without a preceding `begin_frame`.
    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut frame = self.frame.take().ok_or(RenderError::NoActiveFrame)?;
        if !frame.cleared {
            let _pass = self.begin_pass(&mut frame);
        }
        self.context.submit(frame.encoder);
        frame.surface_texture.present();
        Ok(())
    }

    fn begin_pass<'f>(&self, frame: &'f mut Frame) -> wgpu::RenderPass<'f> {
        let (color_load, depth_load) = if frame.cleared {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        } else {
            (
                wgpu::LoadOp::Clear(self.clear_color),
                wgpu::LoadOp::Clear(1.0),
            )
        };
        frame.cleared = true;

        frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Instanced Sphere Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: depth_load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            })
    }

    /// Run `allocate` inside error scopes so allocation failures come back
    /// as errors instead of device-lost callbacks.
    fn scoped<T>(
        &self,
        role: BufferRole,
        allocate: impl FnOnce(&RenderContext) -> T,
    ) -> Result<T, RenderError> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = allocate(&self.context);
        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());

        match validation.or(out_of_memory) {
            Some(err) => Err(RenderError::BufferAllocation {
                role,
                reason: err.to_string(),
            }),
            None => Ok(value),
        }
    }
}

impl RenderBackend for WgpuBackend {
    type Buffer = WgpuBuffer;

    fn create_buffer(
        &mut self,
        role: BufferRole,
        contents: &[u8],
    ) -> Result<WgpuBuffer, RenderError> {
        let inner = self.scoped(role, |context| {
            DynamicBuffer::new_with_data(
                &context.device,
                role.label(),
                contents,
                buffer_usage(role),
            )
        })?;
        log::debug!("{}: {} bytes", inner.label(), inner.capacity());
        Ok(WgpuBuffer { role, inner })
    }

    fn replace_buffer(
        &mut self,
        buffer: &mut WgpuBuffer,
        contents: &[u8],
    ) -> Result<(), RenderError> {
        // The old allocation stays live until the new one is known good.
        let pending = self.scoped(buffer.role, |context| {
            buffer.inner.prepare_growth(&context.device, contents.len())
        })?;
        if let Some(pending) = pending {
            buffer.inner.commit_growth(pending);
        }
        self.scoped(buffer.role, |context| {
            buffer.inner.upload(&context.queue, contents);
        })
    }

    fn draw_indexed_instanced(
        &mut self,
        call: &DrawCall<'_, WgpuBuffer>,
    ) -> Result<(), RenderError> {
        let mut frame = self.frame.take().ok_or(RenderError::NoActiveFrame)?;
        {
            let mut pass = self.begin_pass(&mut frame);
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_vertex_buffer(0, call.vertices.inner.live_slice());
            pass.set_vertex_buffer(1, call.instances.inner.live_slice());
            pass.set_index_buffer(
                call.indices.inner.live_slice(),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..call.index_count, 0, 0..call.instance_count);
        }
        self.frame = Some(frame);
        Ok(())
    }

    fn release_buffer(&mut self, buffer: WgpuBuffer) {
        buffer.inner.destroy();
    }
}
