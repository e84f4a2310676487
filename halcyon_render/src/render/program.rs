/// Program - one shader program per texture kind.
///
/// A `Program` is compiled from a single vertex/fragment template pair. The
/// fragment template is specialized once per `TextureKind` (see
/// `shader_template`), so the same effect can sample RGBA, RGBX and external
/// textures. Draw code activates the variant matching its texture with
/// `use_kind()`, sets uniforms and attributes by name, draws, then calls
/// `deactivate()`.
///
/// Uniform and attribute locations are queried once per variant and cached,
/// misses included.

use std::collections::BTreeSet;
use glam::{Mat4, Vec4};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::gl::{
    Gl, ProgramId, ShaderId, ShaderStage, UniformLocation, AttribData, TexParameter,
    TextureFilter,
};
use super::shader_template::specialize_fragment;
use super::texture::{Texture, TextureKind};
use crate::{gl_call, engine_debug, engine_error, engine_trace, engine_warn};

// ============================================================================
// Compilation helpers
// ============================================================================

/// Compile a single shader stage
///
/// On failure the source and compiler output are logged and the shader
/// object is deleted.
pub fn compile_shader(gl: &dyn Gl, source: &str, stage: ShaderStage) -> Result<ShaderId> {
    let shader = gl_call!(gl, create_shader(stage)).map_err(|err| {
        engine_error!("halcyon::Program", "Failed to create {:?} shader: {}", stage, err);
        Error::ShaderCompilationFailed(err)
    })?;

    gl_call!(gl, shader_source(shader, source));
    gl_call!(gl, compile_shader(shader));

    if !gl_call!(gl, shader_compile_status(shader)) {
        let log = gl_call!(gl, shader_info_log(shader));
        engine_error!(
            "halcyon::Program",
            "Failed to load shader:\n{}\nCompiler output:\n{}",
            source,
            log
        );
        gl_call!(gl, delete_shader(shader));
        return Err(Error::ShaderCompilationFailed(log));
    }

    Ok(shader)
}

/// Compile both stages and link them into a program
///
/// The shader objects are flagged for deletion once attached; they go away
/// together with the program.
pub fn compile_program(gl: &dyn Gl, vertex_source: &str, fragment_source: &str) -> Result<ProgramId> {
    let vertex = compile_shader(gl, vertex_source, ShaderStage::Vertex)?;
    let fragment = match compile_shader(gl, fragment_source, ShaderStage::Fragment) {
        Ok(fragment) => fragment,
        Err(err) => {
            gl_call!(gl, delete_shader(vertex));
            return Err(err);
        }
    };

    let program = match gl_call!(gl, create_program()) {
        Ok(program) => program,
        Err(err) => {
            engine_error!("halcyon::Program", "Failed to create program: {}", err);
            gl_call!(gl, delete_shader(vertex));
            gl_call!(gl, delete_shader(fragment));
            return Err(Error::ShaderCompilationFailed(err));
        }
    };

    gl_call!(gl, attach_shader(program, vertex));
    gl_call!(gl, attach_shader(program, fragment));
    gl_call!(gl, link_program(program));

    gl_call!(gl, delete_shader(vertex));
    gl_call!(gl, delete_shader(fragment));

    if !gl_call!(gl, program_link_status(program)) {
        let log = gl_call!(gl, program_info_log(program));
        engine_error!("halcyon::Program", "Failed to link program:\n{}", log);
        gl_call!(gl, delete_program(program));
        return Err(Error::ShaderCompilationFailed(log));
    }

    Ok(program)
}

// ============================================================================
// Program
// ============================================================================

/// Linked program of one kind plus its location caches
#[derive(Debug)]
struct ProgramVariant {
    id: ProgramId,
    uniforms: FxHashMap<String, Option<UniformLocation>>,
    attribs: FxHashMap<String, Option<u32>>,
}

impl ProgramVariant {
    fn new(id: ProgramId) -> Self {
        Self {
            id,
            uniforms: FxHashMap::default(),
            attribs: FxHashMap::default(),
        }
    }

    fn uniform_location(&mut self, gl: &dyn Gl, name: &str) -> Option<UniformLocation> {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = gl_call!(gl, uniform_location(self.id, name));
        self.uniforms.insert(name.to_string(), location);
        location
    }

    fn attrib_location(&mut self, gl: &dyn Gl, name: &str) -> Option<u32> {
        if let Some(location) = self.attribs.get(name) {
            return *location;
        }

        let location = gl_call!(gl, attrib_location(self.id, name));
        self.attribs.insert(name.to_string(), location);
        location
    }
}

/// Multi-variant shader program
#[derive(Debug, Default)]
pub struct Program {
    variants: [Option<ProgramVariant>; 3],
    active: Option<TextureKind>,
    enabled_attribs: BTreeSet<u32>,
    divisor_attribs: BTreeSet<u32>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== COMPILATION =====

    /// Compile one variant per compiled texture kind
    ///
    /// Previously held programs are freed first. A kind whose variant fails
    /// to build is left without a program (the failure is logged). Returns
    /// the number of variants that compiled.
    pub fn compile(&mut self, gl: &dyn Gl, vertex_source: &str, fragment_source: &str) -> usize {
        self.free_resources(gl);

        let mut compiled = 0;
        for kind in TextureKind::COMPILED {
            let (Some(slot), Some(fragment)) = (kind.slot(), specialize_fragment(fragment_source, kind)) else {
                continue;
            };

            match compile_program(gl, vertex_source, &fragment) {
                Ok(id) => {
                    engine_debug!("halcyon::Program", "Compiled {:?} variant as program {}", kind, id.raw());
                    self.variants[slot] = Some(ProgramVariant::new(id));
                    compiled += 1;
                }
                Err(err) => {
                    engine_warn!("halcyon::Program", "No {:?} variant: {}", kind, err);
                }
            }
        }

        compiled
    }

    /// Register an externally linked program as the only variant, for `kind`
    ///
    /// Previously held programs are freed first. `TextureKind::Invalid`
    /// cannot hold a program.
    pub fn set_simple(&mut self, gl: &dyn Gl, program: ProgramId, kind: TextureKind) -> Result<()> {
        let Some(slot) = kind.slot() else {
            engine_error!("halcyon::Program", "Cannot register a program for {:?}", kind);
            return Err(Error::UsageError(format!("no program slot for {:?}", kind)));
        };

        self.free_resources(gl);
        self.variants[slot] = Some(ProgramVariant::new(program));
        Ok(())
    }

    /// Delete every held program
    ///
    /// An active variant is deactivated first so its vertex arrays do not
    /// stay enabled.
    pub fn free_resources(&mut self, gl: &dyn Gl) {
        if self.active.is_some() {
            self.deactivate(gl);
        }

        for variant in self.variants.iter_mut() {
            if let Some(variant) = variant.take() {
                gl_call!(gl, delete_program(variant.id));
            }
        }
    }

    // ===== ACTIVATION =====

    /// Make the variant for `kind` the current program
    ///
    /// Fails with `Error::UsageError`, without touching GL state, when no
    /// variant exists for `kind`.
    pub fn use_kind(&mut self, gl: &dyn Gl, kind: TextureKind) -> Result<()> {
        let Some(id) = self.program_id(kind) else {
            engine_error!("halcyon::Program", "Program has no variant for texture kind {:?}", kind);
            return Err(Error::UsageError(format!("program has no variant for {:?}", kind)));
        };

        gl_call!(gl, use_program(Some(id)));
        self.active = Some(kind);
        Ok(())
    }

    /// GL program of the variant for `kind`
    pub fn program_id(&self, kind: TextureKind) -> Option<ProgramId> {
        kind.slot()
            .and_then(|slot| self.variants[slot].as_ref())
            .map(|variant| variant.id)
    }

    /// Kind selected by the last `use_kind()`, until `deactivate()`
    pub fn active_kind(&self) -> Option<TextureKind> {
        self.active
    }

    /// Attribute locations enabled since activation
    pub fn enabled_attribs(&self) -> impl Iterator<Item = u32> + '_ {
        self.enabled_attribs.iter().copied()
    }

    fn active_variant(&mut self) -> Result<&mut ProgramVariant> {
        let variant = match self.active.and_then(TextureKind::slot) {
            Some(slot) => self.variants[slot].as_mut(),
            None => None,
        };

        variant.ok_or_else(|| {
            engine_error!("halcyon::Program", "Program used without an active variant");
            Error::UsageError("no active program variant".to_string())
        })
    }

    // ===== UNIFORMS =====

    pub fn uniform1i(&mut self, gl: &dyn Gl, name: &str, value: i32) -> Result<()> {
        let location = self.active_variant()?.uniform_location(gl, name);
        gl_call!(gl, uniform_1_i32(location, value));
        Ok(())
    }

    pub fn uniform1f(&mut self, gl: &dyn Gl, name: &str, value: f32) -> Result<()> {
        let location = self.active_variant()?.uniform_location(gl, name);
        gl_call!(gl, uniform_1_f32(location, value));
        Ok(())
    }

    pub fn uniform2f(&mut self, gl: &dyn Gl, name: &str, x: f32, y: f32) -> Result<()> {
        let location = self.active_variant()?.uniform_location(gl, name);
        gl_call!(gl, uniform_2_f32(location, x, y));
        Ok(())
    }

    pub fn uniform4f(&mut self, gl: &dyn Gl, name: &str, value: Vec4) -> Result<()> {
        let location = self.active_variant()?.uniform_location(gl, name);
        gl_call!(gl, uniform_4_f32(location, value.to_array()));
        Ok(())
    }

    pub fn uniform_matrix4f(&mut self, gl: &dyn Gl, name: &str, value: &Mat4) -> Result<()> {
        let location = self.active_variant()?.uniform_location(gl, name);
        gl_call!(gl, uniform_matrix_4_f32(location, &value.to_cols_array()));
        Ok(())
    }

    // ===== ATTRIBUTES =====

    /// Enable the vertex array `name` and point it at `data`
    ///
    /// Attributes the program does not use are skipped.
    pub fn attrib_pointer(
        &mut self,
        gl: &dyn Gl,
        name: &str,
        size: i32,
        stride: i32,
        data: AttribData<'_>,
    ) -> Result<()> {
        let Some(location) = self.active_variant()?.attrib_location(gl, name) else {
            engine_debug!("halcyon::Program", "Attribute {} is not active, skipped", name);
            return Ok(());
        };

        engine_trace!("halcyon::Program", "attrib {} -> location {}", name, location);
        self.enabled_attribs.insert(location);
        gl_call!(gl, enable_vertex_attrib_array(location));
        gl_call!(gl, vertex_attrib_pointer(location, size, stride, data));
        Ok(())
    }

    /// Set the instancing divisor of attribute `name`
    pub fn attrib_divisor(&mut self, gl: &dyn Gl, name: &str, divisor: u32) -> Result<()> {
        let Some(location) = self.active_variant()?.attrib_location(gl, name) else {
            engine_debug!("halcyon::Program", "Attribute {} is not active, skipped", name);
            return Ok(());
        };

        self.divisor_attribs.insert(location);
        gl_call!(gl, vertex_attrib_divisor(location, divisor));
        Ok(())
    }

    // ===== TEXTURES =====

    /// Bind `texture` to unit 0 and push its orientation uniforms
    pub fn set_active_texture(&mut self, gl: &dyn Gl, texture: &Texture) -> Result<()> {
        // check before touching texture state
        self.active_variant()?;

        gl_call!(gl, active_texture(0));
        gl_call!(gl, bind_texture(texture.target, texture.handle));
        gl_call!(gl, tex_parameter(texture.target, TexParameter::MinFilter(TextureFilter::Linear)));

        let (y_base, y_mult) = if texture.invert_y { (1.0, -1.0) } else { (0.0, 1.0) };
        self.uniform1f(gl, "_halcyon_y_base", y_base)?;
        self.uniform1f(gl, "_halcyon_y_mult", y_mult)?;
        Ok(())
    }

    /// Undo everything the variant enabled since `use_kind()`
    ///
    /// Divisors are reset to 0, arrays disabled and the null program bound.
    pub fn deactivate(&mut self, gl: &dyn Gl) {
        for location in std::mem::take(&mut self.divisor_attribs) {
            gl_call!(gl, vertex_attrib_divisor(location, 0));
        }

        for location in std::mem::take(&mut self.enabled_attribs) {
            gl_call!(gl, disable_vertex_attrib_array(location));
        }

        gl_call!(gl, use_program(None));
        self.active = None;
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        let leaked: Vec<u32> = self.variants.iter().flatten().map(|v| v.id.raw()).collect();
        if !leaked.is_empty() {
            engine_warn!(
                "halcyon::Program",
                "Program dropped without free_resources(), GL programs {:?} leaked",
                leaked
            );
        }
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
