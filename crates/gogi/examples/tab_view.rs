//! Build a small tabbed window, click through it and print each frame.
//!
//! Run with `RUST_LOG=gogi=debug cargo run -p gogi --example tab_view`.

use gogi::prelude::*;
use tracing_subscriber::EnvFilter;

/// Prints the paint list it receives.
struct PrintPainter;

impl Painter for PrintPainter {
    fn paint(&mut self, items: &[PaintItem]) {
        println!("frame with {} items:", items.len());
        for item in items {
            let r = item.rect;
            println!(
                "  {:<8} {:>6.1} {:>6.1} {:>6.1} x {:<6.1}{}",
                item.type_tag,
                r.left(),
                r.top(),
                r.width(),
                r.height(),
                if item.selected { " [selected]" } else { "" }
            );
        }
    }
}

fn main() -> gogi::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut vp = Viewport::new(Size::new(320.0, 200.0));
    vp.set_painter(PrintPainter);
    let root = vp.root();

    let tabs = {
        let mut batch = vp.begin_update();
        let tabs = TabView::new(&mut batch, root, "tabs")?;
        for label in ["General", "Layout", "About"] {
            let frame = tabs.add_tab(&mut batch, label)?;
            let title = batch.add_child(frame, "Label", "title")?;
            batch.set_content_size(title, Size::new(120.0, 18.0))?;
            add_stretch(&mut batch, frame)?;
        }
        for i in 0..tabs.tab_count(&batch) {
            let button = tabs.button(&batch, i)?;
            batch.set_content_size(button, Size::new(64.0, 20.0))?;
        }
        tabs
    };

    vp.connect(tabs.root(), SignalKind::TabSelected, root, |_, event| {
        if let Some(index) = event.payload_as::<usize>() {
            println!("-> tab {index} selected");
        }
    });

    // Second button.
    vp.click_at(Point::new(70.0, 10.0));
    println!("{}", vp.dump_tree());
    Ok(())
}
