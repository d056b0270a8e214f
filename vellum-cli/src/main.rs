//! Vellum CLI
//!
//! A headless driver for testing and debugging: parses a document, runs
//! layout, and either summarizes the result, dumps the box tree as JSON,
//! rasterizes a PNG, or reports the print page count.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::env;
use std::fs;
use std::path::Path;

use vellum_engine::{Engine, Renderer, StreamStatus};
use vellum_layout::paint::print::PrintPainter;
use vellum_layout::{DisplayListPainter, Rect};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: vellum <file.html> [--width N] [--out out.png] [--dump] [--pages]");
        eprintln!("       vellum --html '<html>...</html>'");
        std::process::exit(1);
    }

    let mut source: Option<String> = None;
    let mut inline_html: Option<String> = None;
    let mut width = 800.0_f32;
    let mut out: Option<String> = None;
    let mut dump = false;
    let mut pages = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--html" => {
                inline_html = Some(
                    iter.next()
                        .context("--html requires an HTML string argument")?
                        .clone(),
                );
            }
            "--width" => {
                width = iter
                    .next()
                    .context("--width requires a number")?
                    .parse()
                    .context("--width requires a number")?;
            }
            "--out" => out = Some(iter.next().context("--out requires a path")?.clone()),
            "--dump" => dump = true,
            "--pages" => pages = true,
            path => source = Some(path.to_string()),
        }
    }

    let html = match (inline_html, source) {
        (Some(html), _) => html,
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read '{path}'"))?
        }
        (None, None) => anyhow::bail!("no input given"),
    };

    let mut engine = Engine::new();
    engine.set_viewport_width(width);
    engine.begin("text/html");
    engine.write(&html)?;
    engine.end(StreamStatus::Ok);
    engine.parse_all();

    for event in engine.take_events() {
        println!("{} {event:?}", "event:".cyan());
    }

    engine.relayout();
    println!(
        "{} {} nodes, {:.0}px tall at {width:.0}px wide",
        "layout:".green(),
        engine.tree().len(),
        engine.document_height()
    );

    if dump {
        println!("{}", serde_json::to_string_pretty(engine.tree())?);
    }

    if pages {
        let painter = PrintPainter::letter();
        let count = engine.page_count(&painter, 36.0, 36.0);
        println!("{} {count} page(s) on US Letter", "print:".green());
    }

    if let Some(out) = out {
        let mut painter = DisplayListPainter::new();
        let height = engine.document_height().max(1.0);
        let clip = Rect::new(0.0, 0.0, width, height);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut renderer = Renderer::new(width as u32, height.ceil() as u32, engine.images().clone());
        if let Some(metrics) = renderer.metrics() {
            // Re-lay with the real font so raster and layout agree.
            engine.set_metrics(Box::new(metrics));
            engine.relayout();
        }
        engine.draw(&mut painter, clip, 0.0, 0.0);
        renderer.render(painter.list());
        renderer.save(Path::new(&out))?;
        println!("{} wrote {out}", "render:".green());
    }

    Ok(())
}
