//! Compile, link and build shader programs

use tracing::{debug, warn};

use crate::context::ShaderContext;
use crate::error::{Result, ShaderError, StageListing};
use crate::stage::ShaderSource;

/// Compile one stage behind the shared header.
///
/// On failure the shader object is deleted and the error carries the driver
/// log plus a numbered listing of header + body.
///
/// # Safety
/// Requires a current context on the calling thread
pub unsafe fn compile_stage<C: ShaderContext>(
    ctx: &C,
    name: &str,
    source: &ShaderSource<'_>,
) -> Result<C::Shader> {
    unsafe {
        let shader = ctx
            .create_shader(source.stage)
            .map_err(|message| ShaderError::Create {
                name: name.to_string(),
                object: "shader",
                message,
            })?;

        ctx.shader_source(shader, &source.full_source());
        ctx.compile_shader(shader);

        if !ctx.get_shader_compile_status(shader) {
            let log = ctx.get_shader_info_log(shader);
            ctx.delete_shader(shader);
            warn!(program = name, stage = %source.stage, "shader compilation failed");
            return Err(ShaderError::Compile {
                name: name.to_string(),
                stage: source.stage,
                log,
                listing: source.listing().to_string(),
            });
        }

        debug!(program = name, stage = %source.stage, "compiled shader stage");
        Ok(shader)
    }
}

/// Link compiled stages into a program.
///
/// `sources[i]` must be the source `shaders[i]` was compiled from; the
/// sources are only read to annotate a link failure. On success every stage
/// is detached again so the caller can delete it. On failure the program is
/// deleted and the error lists every stage.
///
/// # Panics
/// If `sources` and `shaders` differ in length. No GL call is made then.
///
/// # Safety
/// Requires a current context on the calling thread
pub unsafe fn link_program<C: ShaderContext>(
    ctx: &C,
    name: &str,
    sources: &[ShaderSource<'_>],
    shaders: &[C::Shader],
) -> Result<C::Program> {
    assert_eq!(
        sources.len(),
        shaders.len(),
        "program '{}': {} sources for {} compiled stages",
        name,
        sources.len(),
        shaders.len()
    );

    unsafe {
        let program = ctx.create_program().map_err(|message| ShaderError::Create {
            name: name.to_string(),
            object: "program",
            message,
        })?;

        for &shader in shaders {
            ctx.attach_shader(program, shader);
        }
        ctx.link_program(program);
        let linked = ctx.get_program_link_status(program);

        for &shader in shaders {
            ctx.detach_shader(program, shader);
        }

        if !linked {
            let log = ctx.get_program_info_log(program);
            ctx.delete_program(program);
            warn!(program = name, stages = shaders.len(), "program link failed");
            return Err(ShaderError::Link {
                name: name.to_string(),
                log,
                stages: sources
                    .iter()
                    .map(|source| StageListing {
                        stage: source.stage,
                        listing: source.listing().to_string(),
                    })
                    .collect(),
            });
        }

        debug!(program = name, stages = shaders.len(), "linked shader program");
        Ok(program)
    }
}

/// Compile every source, link them into one program and delete the stages.
///
/// Stages are compiled in order; the first failure stops the build. Compiled
/// stages never outlive this call, whatever the outcome.
///
/// # Safety
/// Requires a current context on the calling thread
pub unsafe fn build_program<C: ShaderContext>(
    ctx: &C,
    name: &str,
    sources: &[ShaderSource<'_>],
) -> Result<C::Program> {
    unsafe {
        let mut shaders = Vec::with_capacity(sources.len());
        for source in sources {
            match compile_stage(ctx, name, source) {
                Ok(shader) => shaders.push(shader),
                Err(err) => {
                    delete_stages(ctx, &shaders);
                    return Err(err);
                }
            }
        }

        let program = link_program(ctx, name, sources, &shaders);
        delete_stages(ctx, &shaders);
        program
    }
}

unsafe fn delete_stages<C: ShaderContext>(ctx: &C, shaders: &[C::Shader]) {
    for &shader in shaders {
        unsafe { ctx.delete_shader(shader) };
    }
}
