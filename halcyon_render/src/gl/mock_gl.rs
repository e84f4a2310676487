/// Mock GL driver for unit tests (no GPU required)
///
/// Every call is recorded as a string (`"bind_texture(Texture2D, Some(3))"`)
/// so tests can assert on the exact command stream the render layer issues.
/// `get_error` is not recorded: it only drains `push_error` entries.

use std::cell::{Cell, RefCell};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::gl::{
    Gl, GlError, TextureId, FramebufferId, ProgramId, ShaderId, UniformLocation,
    TextureTarget, TexParameter, FramebufferTarget, FramebufferStatus,
    Capability, BlendFactor, DrawMode, ShaderStage, ClearMask, AttribData,
};

/// Recorded vertex attribute upload
#[derive(Debug, Clone, PartialEq)]
pub struct MockAttrib {
    pub size: i32,
    pub stride: i32,
    pub data: Vec<f32>,
}

pub struct MockGl {
    calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
    next_location: Cell<u32>,
    framebuffer_complete: Cell<bool>,
    link_fails: Cell<bool>,
    failing_marker: RefCell<Option<String>>,
    missing_names: RefCell<FxHashSet<String>>,
    pending_errors: RefCell<Vec<GlError>>,
    shader_sources: RefCell<FxHashMap<u32, String>>,
    program_shaders: RefCell<FxHashMap<u32, Vec<u32>>>,
    locations: RefCell<FxHashMap<(u32, String), u32>>,
    attribs: RefCell<FxHashMap<u32, MockAttrib>>,
    live_textures: RefCell<FxHashSet<u32>>,
    live_framebuffers: RefCell<FxHashSet<u32>>,
    live_programs: RefCell<FxHashSet<u32>>,
    live_shaders: RefCell<FxHashSet<u32>>,
}

impl MockGl {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            next_location: Cell::new(0),
            framebuffer_complete: Cell::new(true),
            link_fails: Cell::new(false),
            failing_marker: RefCell::new(None),
            missing_names: RefCell::new(FxHashSet::default()),
            pending_errors: RefCell::new(Vec::new()),
            shader_sources: RefCell::new(FxHashMap::default()),
            program_shaders: RefCell::new(FxHashMap::default()),
            locations: RefCell::new(FxHashMap::default()),
            attribs: RefCell::new(FxHashMap::default()),
            live_textures: RefCell::new(FxHashSet::default()),
            live_framebuffers: RefCell::new(FxHashSet::default()),
            live_programs: RefCell::new(FxHashSet::default()),
            live_shaders: RefCell::new(FxHashSet::default()),
        }
    }

    // ===== Inspection =====

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of recorded calls to the entry point `name`
    pub fn count(&self, name: &str) -> usize {
        let prefix = format!("{}(", name);
        self.calls.borrow().iter().filter(|c| c.starts_with(&prefix)).count()
    }

    pub fn has_call(&self, call: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == call)
    }

    /// Index of the first recorded call equal to `call`
    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == call)
    }

    pub fn shader_source_of(&self, shader: ShaderId) -> Option<String> {
        self.shader_sources.borrow().get(&shader.raw()).cloned()
    }

    /// Fragment source linked into `program` (the last attached shader)
    pub fn fragment_source_of(&self, program: ProgramId) -> Option<String> {
        let shaders = self.program_shaders.borrow();
        let last = shaders.get(&program.raw())?.last().copied()?;
        self.shader_sources.borrow().get(&last).cloned()
    }

    pub fn attrib(&self, location: u32) -> Option<MockAttrib> {
        self.attribs.borrow().get(&location).cloned()
    }

    /// Location the mock assigned to `name` in `program`
    pub fn location_of(&self, program: ProgramId, name: &str) -> Option<u32> {
        self.locations.borrow().get(&(program.raw(), name.to_string())).copied()
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures.borrow().len()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.live_framebuffers.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    // ===== Behaviour knobs =====

    pub fn set_framebuffer_complete(&self, complete: bool) {
        self.framebuffer_complete.set(complete);
    }

    pub fn set_link_fails(&self, fails: bool) {
        self.link_fails.set(fails);
    }

    /// Shaders whose source contains `marker` fail to compile
    pub fn fail_shaders_containing(&self, marker: &str) {
        *self.failing_marker.borrow_mut() = Some(marker.to_string());
    }

    /// Uniform/attribute `name` is reported as inactive in every program
    pub fn hide_name(&self, name: &str) {
        self.missing_names.borrow_mut().insert(name.to_string());
    }

    pub fn push_error(&self, error: GlError) {
        self.pending_errors.borrow_mut().push(error);
    }

    // ===== Helpers =====

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn location(&self, program: ProgramId, name: &str) -> Option<u32> {
        if self.missing_names.borrow().contains(name) {
            return None;
        }
        let key = (program.raw(), name.to_string());
        let mut locations = self.locations.borrow_mut();
        let next = &self.next_location;
        Some(*locations.entry(key).or_insert_with(|| {
            let location = next.get();
            next.set(location + 1);
            location
        }))
    }
}

fn raw<T: Copy>(handle: Option<T>, get: fn(T) -> u32) -> u32 {
    handle.map(get).unwrap_or(0)
}

impl Gl for MockGl {
    fn get_error(&self) -> Option<GlError> {
        let mut pending = self.pending_errors.borrow_mut();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }

    // ===== Textures =====

    fn create_texture(&self) -> Result<TextureId, String> {
        let id = self.alloc_id();
        self.live_textures.borrow_mut().insert(id);
        self.record(format!("create_texture({})", id));
        TextureId::new(id).ok_or_else(|| "zero id".to_string())
    }

    fn delete_texture(&self, texture: TextureId) {
        self.live_textures.borrow_mut().remove(&texture.raw());
        self.record(format!("delete_texture({})", texture.raw()));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        self.record(format!("bind_texture({:?}, {})", target, raw(texture, TextureId::raw)));
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter) {
        self.record(format!("tex_parameter({:?}, {:?})", target, parameter));
    }

    fn tex_image_2d_rgba(&self, width: i32, height: i32) {
        self.record(format!("tex_image_2d_rgba({}, {})", width, height));
    }

    fn active_texture(&self, unit: u32) {
        self.record(format!("active_texture({})", unit));
    }

    // ===== Framebuffers =====

    fn create_framebuffer(&self) -> Result<FramebufferId, String> {
        let id = self.alloc_id();
        self.live_framebuffers.borrow_mut().insert(id);
        self.record(format!("create_framebuffer({})", id));
        FramebufferId::new(id).ok_or_else(|| "zero id".to_string())
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferId) {
        self.live_framebuffers.borrow_mut().remove(&framebuffer.raw());
        self.record(format!("delete_framebuffer({})", framebuffer.raw()));
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        self.record(format!(
            "bind_framebuffer({:?}, {})",
            target,
            raw(framebuffer, FramebufferId::raw)
        ));
    }

    fn framebuffer_texture_2d(&self, texture: TextureId) {
        self.record(format!("framebuffer_texture_2d({})", texture.raw()));
    }

    fn check_framebuffer_status(&self) -> FramebufferStatus {
        self.record("check_framebuffer_status()".to_string());
        if self.framebuffer_complete.get() {
            FramebufferStatus::Complete
        } else {
            // GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT
            FramebufferStatus::Incomplete(0x8CD6)
        }
    }

    // ===== Shaders and programs =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let id = self.alloc_id();
        self.live_shaders.borrow_mut().insert(id);
        self.record(format!("create_shader({:?}, {})", stage, id));
        ShaderId::new(id).ok_or_else(|| "zero id".to_string())
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        self.shader_sources.borrow_mut().insert(shader.raw(), source.to_string());
        self.record(format!("shader_source({})", shader.raw()));
    }

    fn compile_shader(&self, shader: ShaderId) {
        self.record(format!("compile_shader({})", shader.raw()));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let marker = self.failing_marker.borrow();
        match (marker.as_ref(), self.shader_sources.borrow().get(&shader.raw())) {
            (Some(marker), Some(source)) => !source.contains(marker.as_str()),
            _ => true,
        }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        format!("0:1(1): error: mock failure in shader {}", shader.raw())
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.live_shaders.borrow_mut().remove(&shader.raw());
        self.record(format!("delete_shader({})", shader.raw()));
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let id = self.alloc_id();
        self.live_programs.borrow_mut().insert(id);
        self.record(format!("create_program({})", id));
        ProgramId::new(id).ok_or_else(|| "zero id".to_string())
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.program_shaders
            .borrow_mut()
            .entry(program.raw())
            .or_default()
            .push(shader.raw());
        self.record(format!("attach_shader({}, {})", program.raw(), shader.raw()));
    }

    fn link_program(&self, program: ProgramId) {
        self.record(format!("link_program({})", program.raw()));
    }

    fn program_link_status(&self, _program: ProgramId) -> bool {
        !self.link_fails.get()
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        format!("error: mock link failure in program {}", program.raw())
    }

    fn delete_program(&self, program: ProgramId) {
        self.live_programs.borrow_mut().remove(&program.raw());
        self.record(format!("delete_program({})", program.raw()));
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(format!("use_program({})", raw(program, ProgramId::raw)));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.record(format!("uniform_location({}, {})", program.raw(), name));
        self.location(program, name).map(UniformLocation)
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        self.record(format!("attrib_location({}, {})", program.raw(), name));
        self.location(program, name)
    }

    fn uniform_1_i32(&self, location: Option<UniformLocation>, value: i32) {
        self.record(format!("uniform_1_i32({:?}, {})", location.map(|l| l.0), value));
    }

    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32) {
        self.record(format!("uniform_1_f32({:?}, {})", location.map(|l| l.0), value));
    }

    fn uniform_2_f32(&self, location: Option<UniformLocation>, x: f32, y: f32) {
        self.record(format!("uniform_2_f32({:?}, {}, {})", location.map(|l| l.0), x, y));
    }

    fn uniform_4_f32(&self, location: Option<UniformLocation>, value: [f32; 4]) {
        self.record(format!("uniform_4_f32({:?}, {:?})", location.map(|l| l.0), value));
    }

    fn uniform_matrix_4_f32(&self, location: Option<UniformLocation>, value: &[f32; 16]) {
        self.record(format!("uniform_matrix_4_f32({:?}, {:?})", location.map(|l| l.0), value));
    }

    // ===== Vertex attributes =====

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(format!("enable_vertex_attrib_array({})", location));
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        self.record(format!("disable_vertex_attrib_array({})", location));
    }

    fn vertex_attrib_pointer(&self, location: u32, size: i32, stride: i32, data: AttribData<'_>) {
        let values = match data {
            AttribData::Float(values) => values.to_vec(),
            AttribData::UnsignedByte(values) => values.iter().map(|v| *v as f32).collect(),
        };
        self.attribs.borrow_mut().insert(location, MockAttrib { size, stride, data: values });
        self.record(format!("vertex_attrib_pointer({}, {}, {})", location, size, stride));
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        self.record(format!("vertex_attrib_divisor({}, {})", location, divisor));
    }

    // ===== Fixed function state =====

    fn enable(&self, capability: Capability) {
        self.record(format!("enable({:?})", capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(format!("disable({:?})", capability));
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        self.record(format!("blend_func({:?}, {:?})", src, dst));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport({}, {}, {}, {})", x, y, width, height));
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("scissor({}, {}, {}, {})", x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("clear_color({}, {}, {}, {})", r, g, b, a));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(format!("clear({:?})", mask));
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        self.record(format!("draw_arrays({:?}, {}, {})", mode, first, count));
    }

    // ===== Teardown =====

    fn release_backend_resources(&self) {
        self.record("release_backend_resources()".to_string());
    }
}
