//! Recording [`GlBackend`] for unit tests.

use std::cell::{Cell, RefCell};

use super::backend::GlBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Enable(u32),
    Viewport(i32, i32, i32, i32),
    CreateBuffer(Id),
    BindBuffer(u32, Option<Id>),
    BufferData { target: u32, len: usize, usage: u32 },
    DeleteBuffer(Id),
    CreateVertexArray(Id),
    BindVertexArray(Option<Id>),
    DeleteVertexArray(Id),
    VertexAttribPointer { index: u32, size: i32, data_type: u32, stride: i32, offset: i32 },
    EnableVertexAttribArray(u32),
    CreateShader { shader: Id, shader_type: u32 },
    CompileShader(Id),
    DeleteShader(Id),
    CreateProgram(Id),
    AttachShader(Id, Id),
    DetachShader(Id, Id),
    LinkProgram(Id),
    ValidateProgram(Id),
    DeleteProgram(Id),
    UseProgram(Option<Id>),
    UniformMatrix4 { location: u32, transpose: bool, values: Vec<f32> },
    ClearColor([f32; 4]),
    Clear(u32),
    DrawElements { mode: u32, count: i32, element_type: u32, offset: i32 },
}

/// Records every call and answers queries from a small scripted state.
#[derive(Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<GlCall>>,
    next_id: Cell<u32>,
    sources: RefCell<Vec<(Id, String)>>,
    /// Sources containing this marker fail to compile.
    pub fail_compile_marker: Option<&'static str>,
    pub fail_link: bool,
    pub fail_validate: bool,
    pub missing_uniforms: Vec<&'static str>,
    pub info_log: Option<String>,
    /// Buffer creation fails after this many successful allocations.
    pub buffer_limit: Option<u32>,
    pub fail_vertex_array: bool,
    buffers_created: Cell<u32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> Id {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Id(id)
    }

    fn log_text(&self, default: &str) -> String {
        self.info_log.clone().unwrap_or_else(|| default.to_string())
    }
}

impl GlBackend for RecordingBackend {
    type Buffer = Id;
    type VertexArray = Id;
    type Shader = Id;
    type Program = Id;
    type UniformLocation = u32;

    fn enable(&self, capability: u32) {
        self.record(GlCall::Enable(capability));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn create_buffer(&self) -> Result<Id, String> {
        if let Some(limit) = self.buffer_limit {
            if self.buffers_created.get() >= limit {
                return Err("out of memory".to_string());
            }
        }
        self.buffers_created.set(self.buffers_created.get() + 1);
        let id = self.alloc();
        self.record(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Id>) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        self.record(GlCall::BufferData { target, len: data.len(), usage });
    }

    fn delete_buffer(&self, buffer: Id) {
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<Id, String> {
        if self.fail_vertex_array {
            return Err("out of memory".to_string());
        }
        let id = self.alloc();
        self.record(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<Id>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: Id) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        _normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(GlCall::VertexAttribPointer { index, size, data_type, stride, offset });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn create_shader(&self, shader_type: u32) -> Result<Id, String> {
        let shader = self.alloc();
        self.record(GlCall::CreateShader { shader, shader_type });
        Ok(shader)
    }

    fn shader_source(&self, shader: Id, source: &str) {
        self.sources.borrow_mut().push((shader, source.to_string()));
    }

    fn compile_shader(&self, shader: Id) {
        self.record(GlCall::CompileShader(shader));
    }

    fn get_shader_compile_status(&self, shader: Id) -> bool {
        let Some(marker) = self.fail_compile_marker else {
            return true;
        };
        !self
            .sources
            .borrow()
            .iter()
            .any(|(id, source)| *id == shader && source.contains(marker))
    }

    fn get_shader_info_log(&self, _shader: Id) -> String {
        self.log_text("0:1(1): error: syntax error, unexpected IDENTIFIER")
    }

    fn delete_shader(&self, shader: Id) {
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<Id, String> {
        let id = self.alloc();
        self.record(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: Id, shader: Id) {
        self.record(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: Id, shader: Id) {
        self.record(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: Id) {
        self.record(GlCall::LinkProgram(program));
    }

    fn get_program_link_status(&self, _program: Id) -> bool {
        !self.fail_link
    }

    fn validate_program(&self, program: Id) {
        self.record(GlCall::ValidateProgram(program));
    }

    fn get_program_validate_status(&self, _program: Id) -> bool {
        !self.fail_validate
    }

    fn get_program_info_log(&self, _program: Id) -> String {
        self.log_text("error: vertex output 'vecColor' not read by fragment shader")
    }

    fn delete_program(&self, program: Id) {
        self.record(GlCall::DeleteProgram(program));
    }

    fn get_uniform_location(&self, program: Id, name: &str) -> Option<u32> {
        if self.missing_uniforms.iter().any(|missing| *missing == name) {
            return None;
        }
        match name {
            "model" => Some(program.0 * 10),
            "projection" => Some(program.0 * 10 + 1),
            _ => None,
        }
    }

    fn use_program(&self, program: Option<Id>) {
        self.record(GlCall::UseProgram(program));
    }

    fn uniform_matrix_4_f32_slice(&self, location: &u32, transpose: bool, values: &[f32]) {
        self.record(GlCall::UniformMatrix4 {
            location: *location,
            transpose,
            values: values.to_vec(),
        });
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(GlCall::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: u32) {
        self.record(GlCall::Clear(mask));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record(GlCall::DrawElements { mode, count, element_type, offset });
    }
}
