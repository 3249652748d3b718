//! One shared sphere mesh drawn once per atom in a single instanced call.
//!
//! Lifecycle: [`Uninitialized`](RendererPhase::Uninitialized) →
//! [`initialize`](InstancedSphereRenderer::initialize) →
//! [`Ready`](RendererPhase::Ready) →
//! [`draw_instances`](InstancedSphereRenderer::draw_instances)* →
//! [`shutdown`](InstancedSphereRenderer::shutdown) →
//! [`Released`](RendererPhase::Released).

use super::{
    backend::{BufferRole, DrawCall, RenderBackend},
    RenderError,
};
use crate::{chem::InstanceDescriptor, mesh::MeshGeometry};

/// Per-instance data as uploaded: position.xyz, radius, color.rgb.
/// Must match the location 3–5 inputs of `instanced_sphere.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Sphere center.
    pub position: [f32; 3],
    /// Sphere radius.
    pub radius: f32,
    /// RGB color.
    pub color: [f32; 3],
}

impl From<&InstanceDescriptor> for InstanceRaw {
    fn from(instance: &InstanceDescriptor) -> Self {
        Self {
            position: instance.position.to_array(),
            radius: instance.radius,
            color: instance.color.to_array(),
        }
    }
}

/// Serialize `instances` into `out`, replacing its contents.
pub fn pack_instances(
    instances: &[InstanceDescriptor],
    out: &mut Vec<InstanceRaw>,
) {
    out.clear();
    out.extend(instances.iter().map(InstanceRaw::from));
}

/// Where a renderer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererPhase {
    /// No GPU resources yet.
    Uninitialized,
    /// Mesh uploaded; draws allowed.
    Ready,
    /// Resources freed by `shutdown`.
    Released,
}

struct GpuMesh<Buf> {
    vertices: Buf,
    indices: Buf,
    instances: Buf,
    index_count: u32,
    mesh: MeshGeometry,
}

enum State<Buf> {
    Uninitialized,
    Ready(GpuMesh<Buf>),
    Released,
}

/// Draws every atom as a scaled, colored copy of one sphere mesh.
///
/// Owns its backend and the three buffers it creates; dropping the renderer
/// releases them.
pub struct InstancedSphereRenderer<B: RenderBackend> {
    backend: B,
    state: State<B::Buffer>,
    staging: Vec<InstanceRaw>,
    instance_count: u32,
}

impl<B: RenderBackend> InstancedSphereRenderer<B> {
    /// Uninitialized renderer driving `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: State::Uninitialized,
            staging: Vec::new(),
            instance_count: 0,
        }
    }

    /// Upload `mesh` and create the (empty) instance buffer.
    ///
    /// If any buffer cannot be created the ones already created are freed
    /// and the renderer keeps its previous phase.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyInitialized`] if called while ready;
    /// [`RenderError::BufferAllocation`] from the backend.
    pub fn initialize(
        &mut self,
        mesh: MeshGeometry,
    ) -> Result<(), RenderError> {
        if matches!(self.state, State::Ready(_)) {
            return Err(RenderError::AlreadyInitialized);
        }
        let index_count = u32::try_from(mesh.index_count())
            .map_err(|_| RenderError::TooManyIndices(mesh.index_count()))?;

        let vertices = self.backend.create_buffer(
            BufferRole::Vertex,
            bytemuck::cast_slice(&mesh.vertices),
        )?;
        let indices = match self.backend.create_buffer(
            BufferRole::Index,
            bytemuck::cast_slice(&mesh.indices),
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.backend.release_buffer(vertices);
                return Err(e);
            }
        };
        let instances =
            match self.backend.create_buffer(BufferRole::Instance, &[]) {
                Ok(buffer) => buffer,
                Err(e) => {
                    self.backend.release_buffer(indices);
                    self.backend.release_buffer(vertices);
                    return Err(e);
                }
            };

        log::info!(
            "Sphere renderer ready: {} vertices, {} triangles",
            mesh.vertex_count(),
            index_count / 3
        );
        self.instance_count = 0;
        self.state = State::Ready(GpuMesh {
            vertices,
            indices,
            instances,
            index_count,
            mesh,
        });
        Ok(())
    }

    /// Replace the instance buffer with `instances` and draw them all.
    ///
    /// An empty slice clears the buffer and submits nothing.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotInitialized`] / [`RenderError::Released`] outside
    /// the ready phase, [`RenderError::TooManyInstances`] past `u32::MAX`,
    /// and any backend error.
    pub fn draw_instances(
        &mut self,
        instances: &[InstanceDescriptor],
    ) -> Result<(), RenderError> {
        let gpu = match &mut self.state {
            State::Ready(gpu) => gpu,
            State::Uninitialized => return Err(RenderError::NotInitialized),
            State::Released => return Err(RenderError::Released),
        };
        let instance_count = u32::try_from(instances.len())
            .map_err(|_| RenderError::TooManyInstances(instances.len()))?;

        pack_instances(instances, &mut self.staging);
        self.backend.replace_buffer(
            &mut gpu.instances,
            bytemuck::cast_slice(&self.staging),
        )?;
        self.instance_count = instance_count;

        if instance_count == 0 {
            return Ok(());
        }
        self.backend.draw_indexed_instanced(&DrawCall {
            vertices: &gpu.vertices,
            indices: &gpu.indices,
            instances: &gpu.instances,
            index_count: gpu.index_count,
            instance_count,
        })
    }

    /// Free every GPU buffer. Calling it again, or before `initialize`, does
    /// nothing.
    pub fn shutdown(&mut self) {
        match std::mem::replace(&mut self.state, State::Released) {
            State::Ready(gpu) => {
                self.backend.release_buffer(gpu.instances);
                self.backend.release_buffer(gpu.indices);
                self.backend.release_buffer(gpu.vertices);
                self.instance_count = 0;
                log::debug!("Sphere renderer buffers released");
            }
            State::Uninitialized => self.state = State::Uninitialized,
            State::Released => {}
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RendererPhase {
        match self.state {
            State::Uninitialized => RendererPhase::Uninitialized,
            State::Ready(_) => RendererPhase::Ready,
            State::Released => RendererPhase::Released,
        }
    }

    /// Instances uploaded by the last draw.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// The mesh being drawn, while ready.
    pub fn mesh(&self) -> Option<&MeshGeometry> {
        match &self.state {
            State::Ready(gpu) => Some(&gpu.mesh),
            _ => None,
        }
    }

    /// Shared access to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend (frame begin/end, resize).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for InstancedSphereRenderer<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use glam::Vec3;

    use super::*;
    use crate::mesh::sphere;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Create(BufferRole, usize),
        Replace(usize, Vec<f32>),
        Draw {
            index_count: u32,
            instance_count: u32,
            instance_data: Vec<f32>,
        },
        Release(usize),
    }

    #[derive(Default)]
    struct Log {
        events: Vec<Event>,
        live: Vec<usize>,
    }

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    /// Records every call; buffers are ids into `contents`.
    struct RecordingBackend {
        log: Rc<RefCell<Log>>,
        contents: Vec<Vec<u8>>,
        fail_on: Option<BufferRole>,
        // Replacements larger than this fail and keep the old contents.
        replace_limit: Option<usize>,
    }

    impl RecordingBackend {
        fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            let backend = Self {
                log: Rc::clone(&log),
                contents: Vec::new(),
                fail_on: None,
                replace_limit: None,
            };
            (backend, log)
        }
    }

    impl RenderBackend for RecordingBackend {
        type Buffer = usize;

        fn create_buffer(
            &mut self,
            role: BufferRole,
            contents: &[u8],
        ) -> Result<usize, RenderError> {
            if self.fail_on == Some(role) {
                return Err(RenderError::BufferAllocation {
                    role,
                    reason: "out of memory".into(),
                });
            }
            let id = self.contents.len();
            self.contents.push(contents.to_vec());
            let mut log = self.log.borrow_mut();
            log.events.push(Event::Create(role, contents.len()));
            log.live.push(id);
            Ok(id)
        }

        fn replace_buffer(
            &mut self,
            buffer: &mut usize,
            contents: &[u8],
        ) -> Result<(), RenderError> {
            if self.replace_limit.is_some_and(|limit| contents.len() > limit) {
                return Err(RenderError::BufferAllocation {
                    role: BufferRole::Instance,
                    reason: "out of memory".into(),
                });
            }
            self.contents[*buffer] = contents.to_vec();
            self.log
                .borrow_mut()
                .events
                .push(Event::Replace(*buffer, floats(contents)));
            Ok(())
        }

        fn draw_indexed_instanced(
            &mut self,
            call: &DrawCall<'_, usize>,
        ) -> Result<(), RenderError> {
            let instance_data = floats(&self.contents[*call.instances]);
            self.log.borrow_mut().events.push(Event::Draw {
                index_count: call.index_count,
                instance_count: call.instance_count,
                instance_data,
            });
            Ok(())
        }

        fn release_buffer(&mut self, buffer: usize) {
            let mut log = self.log.borrow_mut();
            log.events.push(Event::Release(buffer));
            log.live.retain(|&id| id != buffer);
        }
    }

    fn ready_renderer(
    ) -> (InstancedSphereRenderer<RecordingBackend>, Rc<RefCell<Log>>) {
        let (backend, log) = RecordingBackend::new();
        let mut renderer = InstancedSphereRenderer::new(backend);
        renderer.initialize(sphere::generate(4, 2).unwrap()).unwrap();
        (renderer, log)
    }

    fn draws(log: &Rc<RefCell<Log>>) -> Vec<Event> {
        log.borrow()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Draw { .. }))
            .cloned()
            .collect()
    }

    fn atom(x: f32, radius: f32, grey: f32) -> InstanceDescriptor {
        InstanceDescriptor::new(
            Vec3::new(x, 0.0, 0.0),
            radius,
            Vec3::splat(grey),
        )
    }

    #[test]
    fn initialize_uploads_mesh_and_empty_instances() {
        let (renderer, log) = ready_renderer();
        assert_eq!(renderer.phase(), RendererPhase::Ready);
        assert_eq!(
            log.borrow().events,
            vec![
                Event::Create(BufferRole::Vertex, 15 * 32),
                Event::Create(BufferRole::Index, 24 * 4),
                Event::Create(BufferRole::Instance, 0),
            ]
        );
    }

    #[test]
    fn draw_serializes_seven_floats_per_instance() {
        let (mut renderer, log) = ready_renderer();
        let instances = [
            InstanceDescriptor::new(
                Vec3::new(1.0, 2.0, 3.0),
                1.7,
                Vec3::new(0.1, 0.2, 0.3),
            ),
            InstanceDescriptor::new(Vec3::ZERO, 1.5, Vec3::ONE),
        ];
        renderer.draw_instances(&instances).unwrap();

        assert_eq!(
            draws(&log),
            vec![Event::Draw {
                index_count: 24,
                instance_count: 2,
                instance_data: vec![
                    1.0, 2.0, 3.0, 1.7, 0.1, 0.2, 0.3, //
                    0.0, 0.0, 0.0, 1.5, 1.0, 1.0, 1.0,
                ],
            }]
        );
        assert_eq!(renderer.instance_count(), 2);
    }

    #[test]
    fn empty_draw_clears_buffer_without_submitting() {
        let (mut renderer, log) = ready_renderer();
        renderer.draw_instances(&[atom(1.0, 1.0, 0.5)]).unwrap();
        renderer.draw_instances(&[]).unwrap();

        assert_eq!(draws(&log).len(), 1);
        assert_eq!(renderer.instance_count(), 0);
        let last = log.borrow().events.last().cloned();
        assert!(matches!(
            last,
            Some(Event::Replace(_, ref data)) if data.is_empty()
        ));
    }

    #[test]
    fn shorter_draw_leaves_no_stale_instances() {
        let (mut renderer, log) = ready_renderer();
        let long: Vec<_> = (0..5).map(|i| atom(i as f32, 1.0, 0.2)).collect();
        renderer.draw_instances(&long).unwrap();
        renderer.draw_instances(&[atom(9.0, 2.0, 0.9)]).unwrap();

        let draws = draws(&log);
        assert_eq!(draws.len(), 2);
        match &draws[1] {
            Event::Draw {
                instance_count,
                instance_data,
                ..
            } => {
                assert_eq!(*instance_count, 1);
                assert_eq!(
                    instance_data,
                    &vec![9.0, 0.0, 0.0, 2.0, 0.9, 0.9, 0.9]
                );
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn draw_before_initialize_fails() {
        let (backend, log) = RecordingBackend::new();
        let mut renderer = InstancedSphereRenderer::new(backend);
        assert_eq!(
            renderer.draw_instances(&[atom(0.0, 1.0, 1.0)]),
            Err(RenderError::NotInitialized)
        );
        assert!(log.borrow().events.is_empty());
    }

    #[test]
    fn second_initialize_is_rejected_without_allocating() {
        let (mut renderer, log) = ready_renderer();
        let before = log.borrow().events.len();
        assert_eq!(
            renderer.initialize(sphere::generate(8, 4).unwrap()),
            Err(RenderError::AlreadyInitialized)
        );
        assert_eq!(log.borrow().events.len(), before);
        assert_eq!(renderer.mesh().map(MeshGeometry::vertex_count), Some(15));
    }

    #[test]
    fn failed_initialize_releases_partial_buffers() {
        for failing in [BufferRole::Index, BufferRole::Instance] {
            let (mut backend, log) = RecordingBackend::new();
            backend.fail_on = Some(failing);
            let mut renderer = InstancedSphereRenderer::new(backend);
            let result = renderer.initialize(sphere::generate(4, 2).unwrap());

            assert!(matches!(
                result,
                Err(RenderError::BufferAllocation { role, .. })
                    if role == failing
            ));
            assert_eq!(renderer.phase(), RendererPhase::Uninitialized);
            assert!(log.borrow().live.is_empty(), "{failing:?} leaked");
        }
    }

    #[test]
    fn shutdown_is_idempotent_and_blocks_draws() {
        let (mut renderer, log) = ready_renderer();
        renderer.shutdown();
        renderer.shutdown();

        assert_eq!(renderer.phase(), RendererPhase::Released);
        assert!(log.borrow().live.is_empty());
        let releases = log
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Release(_)))
            .count();
        assert_eq!(releases, 3);
        assert_eq!(
            renderer.draw_instances(&[]),
            Err(RenderError::Released)
        );
    }

    #[test]
    fn reinitialize_after_shutdown() {
        let (mut renderer, log) = ready_renderer();
        renderer.shutdown();
        renderer.initialize(sphere::generate(3, 2).unwrap()).unwrap();
        assert_eq!(renderer.phase(), RendererPhase::Ready);
        assert_eq!(log.borrow().live.len(), 3);
    }

    #[test]
    fn shutdown_before_initialize_is_a_no_op() {
        let (backend, log) = RecordingBackend::new();
        let mut renderer = InstancedSphereRenderer::new(backend);
        renderer.shutdown();
        assert_eq!(renderer.phase(), RendererPhase::Uninitialized);
        assert!(log.borrow().events.is_empty());
    }

    #[test]
    fn drop_releases_buffers() {
        let (renderer, log) = ready_renderer();
        assert_eq!(log.borrow().live.len(), 3);
        drop(renderer);
        assert!(log.borrow().live.is_empty());
    }

    #[test]
    fn failed_instance_growth_keeps_renderer_usable() {
        let (mut renderer, log) = ready_renderer();
        let pair = [atom(0.0, 1.0, 0.1), atom(1.0, 1.0, 0.2)];
        renderer.draw_instances(&pair).unwrap();
        renderer.backend_mut().replace_limit = Some(2 * 28);

        let triple = [pair[0], pair[1], atom(2.0, 1.0, 0.3)];
        assert!(matches!(
            renderer.draw_instances(&triple),
            Err(RenderError::BufferAllocation {
                role: BufferRole::Instance,
                ..
            })
        ));
        assert_eq!(renderer.phase(), RendererPhase::Ready);
        assert_eq!(renderer.instance_count(), 2);
        assert_eq!(draws(&log).len(), 1);

        // The old buffer still takes writes that fit.
        renderer.draw_instances(&pair[..1]).unwrap();
        renderer.backend_mut().replace_limit = None;
        renderer.draw_instances(&triple).unwrap();

        let draws = draws(&log);
        assert_eq!(draws.len(), 3);
        let Event::Draw {
            instance_count,
            instance_data,
            ..
        } = &draws[2]
        else {
            panic!("expected a draw");
        };
        assert_eq!(*instance_count, 3);
        assert_eq!(instance_data.len(), 21);
        assert_eq!(instance_data[14], 2.0);
    }
}
