//! Recording stand-in for a GL context, used by the builder tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use crate::context::ShaderContext;
use crate::stage::ShaderStage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateShader(ShaderStage),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram,
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    DeleteProgram(u32),
}

/// Fake context with scriptable failures.
///
/// A shader fails to compile when its source contains one of the
/// `compile_errors` tokens; the log then names the line the token sits on,
/// the way a GLSL compiler would.
#[derive(Debug, Default)]
pub struct MockContext {
    pub compile_errors: Vec<&'static str>,
    pub link_error: Option<&'static str>,
    pub refuse_objects: bool,

    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    sources: RefCell<HashMap<u32, String>>,
    live_shaders: RefCell<BTreeSet<u32>>,
    live_programs: RefCell<BTreeSet<u32>>,
    attached: RefCell<BTreeSet<(u32, u32)>>,
    linked: RefCell<BTreeSet<u32>>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(token: &'static str) -> Self {
        Self {
            compile_errors: vec![token],
            ..Self::default()
        }
    }

    pub fn failing_link(log: &'static str) -> Self {
        Self {
            link_error: Some(log),
            ..Self::default()
        }
    }

    /// Context whose object allocations all fail
    pub fn refusing_objects() -> Self {
        Self {
            refuse_objects: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn compile_count(&self) -> usize {
        self.count(|call| matches!(call, Call::CompileShader(_)))
    }

    pub fn link_count(&self) -> usize {
        self.count(|call| matches!(call, Call::LinkProgram(_)))
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn attachments(&self) -> usize {
        self.attached.borrow().len()
    }

    pub fn source_of(&self, shader: u32) -> Option<String> {
        self.sources.borrow().get(&shader).cloned()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn compile_log(&self, shader: u32) -> Option<String> {
        let sources = self.sources.borrow();
        let source = sources.get(&shader)?;
        self.compile_errors.iter().find_map(|token| {
            source
                .split('\n')
                .position(|line| line.contains(token))
                .map(|index| format!("ERROR: 0:{}: '{}' : syntax error\n", index + 1, token))
        })
    }
}

impl ShaderContext for MockContext {
    type Shader = u32;
    type Program = u32;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        self.record(Call::CreateShader(stage));
        if self.refuse_objects {
            return Err("out of memory".to_string());
        }
        let id = self.allocate();
        self.live_shaders.borrow_mut().insert(id);
        Ok(id)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        self.record(Call::ShaderSource(shader));
        self.sources.borrow_mut().insert(shader, source.to_string());
    }

    unsafe fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.compile_log(shader).is_none()
    }

    unsafe fn get_shader_info_log(&self, shader: u32) -> String {
        self.compile_log(shader).unwrap_or_default()
    }

    unsafe fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
        assert!(
            self.live_shaders.borrow_mut().remove(&shader),
            "deleted unknown shader {shader}"
        );
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        self.record(Call::CreateProgram);
        if self.refuse_objects {
            return Err("out of memory".to_string());
        }
        let id = self.allocate();
        self.live_programs.borrow_mut().insert(id);
        Ok(id)
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
        self.attached.borrow_mut().insert((program, shader));
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
        assert!(
            self.attached.borrow_mut().remove(&(program, shader)),
            "shader {shader} was not attached to program {program}"
        );
    }

    unsafe fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        if self.link_error.is_none() {
            self.linked.borrow_mut().insert(program);
        }
    }

    unsafe fn get_program_link_status(&self, program: u32) -> bool {
        self.linked.borrow().contains(&program)
    }

    unsafe fn get_program_info_log(&self, _program: u32) -> String {
        self.link_error.unwrap_or_default().to_string()
    }

    unsafe fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
        self.live_programs.borrow_mut().remove(&program);
        self.attached.borrow_mut().retain(|(p, _)| *p != program);
    }
}
