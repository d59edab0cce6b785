mod app;
mod graph;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a JSON graph file ({"nodes": [...], "edges": [...]}).
    #[arg(long)]
    graph: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "repograph",
        options,
        Box::new(move |cc| Ok(Box::new(app::RepoGraphApp::new(cc, args.graph.clone())))),
    )
}
