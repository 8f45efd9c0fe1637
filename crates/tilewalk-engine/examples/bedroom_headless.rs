//! Headless bedroom walkthrough -- walk to the teddy bear, inspect it, quit.
//!
//! Run with:
//!   cargo run --example bedroom_headless -p tilewalk-engine [config.json]
//!
//! Set `RUST_LOG=debug` to see every frame the log renderer presents.

use anyhow::Context;
use tilewalk_engine::demo;
use tilewalk_engine::prelude::*;

fn load_config() -> anyhow::Result<EngineConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = EngineConfig::from_json_str(&json).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

fn script(bindings: &KeyBindings) -> ScriptedInput {
    let walk = InputFrame::new().with(bindings.up).with(bindings.right);
    let mut feed = ScriptedInput::new(vec![walk; 40]);
    feed.extend([
        InputFrame::new().with(bindings.interact),
        InputFrame::new(),
    ]);
    feed.extend(vec![InputFrame::new(); 60]);
    feed.extend([InputFrame::new().with(bindings.quit)]);
    feed
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let mut feed = script(&config.bindings);
    let mut renderer = LogRenderer::new();
    let mut pacer = pacer_for(&config);

    let mut frame_loop = FrameLoop::new(config.clone());
    frame_loop.states_mut().push(Box::new(demo::bedroom(&config)));

    let summary = frame_loop.run(&mut feed, &mut renderer, pacer.as_mut());
    println!("stopped after {} frames: {}", summary.frames, summary.reason);
    Ok(())
}
