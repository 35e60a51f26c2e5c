use hoplite_transform::{
    Camera, EmulatedFixedFunction, GpuContext, PipelineConfig, PipelineResult, PipelineState,
    ProgramArena, Quat, ShaderProgram, TRANSFORM_WGSL, Transform, TransformBackend,
    TransformMode, TransformUniformBuffer, UniformBlock, Vec3, WgslProgram,
};

const ASPECT: f32 = 16.0 / 9.0;

/// A small solar system: a sun with a planet and its moon.
fn draw_scene<B: TransformBackend>(
    pipeline: &mut PipelineState<B>,
    program: &WgslProgram,
    time: f32,
) {
    Camera::new()
        .at(0.0, 6.0, 14.0)
        .looking_at(0.0, 0.0, 0.0)
        .with_fov(60.0)
        .with_clip(0.5, 100.0)
        .load_into(pipeline, ASPECT);

    pipeline.with_pushed(|p| {
        p.rotate(Quat::from_rotation_y(time * 0.2));
        p.apply(program);

        p.with_pushed(|p| {
            p.rotate_axis(time * 45.0, Vec3::Y);
            p.apply_transform(
                &Transform::from_position(Vec3::new(6.0, 0.0, 0.0)).uniform_scale(0.5),
            );
            p.apply(program);

            p.with_pushed(|p| {
                p.rotate_axis(time * 120.0, Vec3::Y);
                p.translate(Vec3::new(2.0, 0.0, 0.0));
                p.scale(Vec3::splat(0.3));
                p.apply(program);
            });
        });
    });
}

fn main() -> PipelineResult<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut programs = ProgramArena::new();
    let program = WgslProgram::from_source(programs.allocate(), TRANSFORM_WGSL, "transforms")?;
    tracing::info!(
        "Reflected '{}' ({} bytes, group {}, binding {})",
        program.block_name(),
        program.block_size(),
        program.group(),
        program.binding()
    );

    // Run the same scene through both strategies and compare the results.
    let config = PipelineConfig::default().max_stack_depth(32);
    let mut legacy = PipelineState::from_config(
        &config.clone().legacy(),
        EmulatedFixedFunction::new(),
        UniformBlock::new(0),
    );
    let mut shader = PipelineState::shader(
        &config,
        UniformBlock::new(program.block_size() as usize),
    );

    for frame in 0..4 {
        let time = frame as f32 * 0.25;
        draw_scene(&mut legacy, &program, time);
        draw_scene(&mut shader, &program, time);

        let agree = TransformMode::ALL
            .into_iter()
            .all(|mode| legacy.top_of(mode).abs_diff_eq(shader.top_of(mode), 1e-5));
        tracing::info!("Frame {}: strategies agree = {}", frame, agree);
    }

    let block = shader.backend().uniforms();
    tracing::info!(
        "Last normal matrix upload: {:?}",
        block.read_mat3(program.uniform_location("normal_matrix"))
    );

    // Upload through a real uniform buffer when a GPU is around.
    match GpuContext::headless() {
        Ok(gpu) => {
            // One slot per apply; the sun, planet and moon each keep their own.
            let uniforms = TransformUniformBuffer::for_program(&gpu, &program, 16);
            let mut pipeline = PipelineState::shader(&config, uniforms);
            draw_scene(&mut pipeline, &program, 1.0);

            let uploaded = pipeline.backend().uniforms().slots_used();
            pipeline.backend_mut().uniforms_mut().flush(&gpu.queue);
            gpu.queue.submit([]);
            tracing::info!(
                "Flushed {} transform slots of {} bytes to the GPU",
                uploaded,
                pipeline.backend().uniforms().block().len()
            );
        }
        Err(err) => tracing::warn!("Skipping GPU upload: {}", err),
    }

    shader.forget_program(program.id());
    programs.release(program.id());
    Ok(())
}
