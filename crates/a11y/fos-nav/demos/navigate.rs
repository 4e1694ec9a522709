//! Example: walking a small page the way a screen reader would
//!
//! Run with `RUST_LOG=fos_nav=debug` to see traversal events.

use fos_nav::predicates;
use fos_nav::{
    AccessibilityTree, AriaRole, AutomationTree, Direction, Granularity, NavConfig, Navigator, NodeBounds, Step,
    TreeEvent,
};
use fos_spannable::SpanRegistry;
use tracing_subscriber::EnvFilter;

fn build_page() -> AccessibilityTree {
    let mut tree = AccessibilityTree::new();
    let root = tree.create_root();

    let heading = tree.add_node(AriaRole::Heading, Some(root));
    if let Some(node) = tree.get_node_mut(heading) {
        node.state.level = Some(1);
    }
    tree.add_text(heading, "Welcome", NodeBounds::new(0.0, 0.0, 120.0, 24.0));

    let p = tree.add_node(AriaRole::Paragraph, Some(root));
    tree.add_text(p, "Read the guide first. Then try", NodeBounds::new(0.0, 30.0, 220.0, 16.0));
    let link = tree.add_node(AriaRole::Link, Some(p));
    tree.add_text(link, "the demo", NodeBounds::new(225.0, 30.0, 60.0, 16.0));

    let field = tree.add_node(AriaRole::TextBox, Some(root));
    if let Some(node) = tree.get_node_mut(field) {
        node.set_name("Search");
        node.value = Some("braille".into());
        node.text_selection = Some((0, 7));
        node.bounds = NodeBounds::new(0.0, 60.0, 200.0, 20.0);
    }
    tree
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = build_page();
    let registry = SpanRegistry::braille()?;
    let mut nav = Navigator::new(NavConfig::default());

    let root = tree.root().ok_or_else(|| anyhow::anyhow!("page has no root"))?;
    nav.on_tree_event(&tree, &TreeEvent::LoadComplete(root));

    println!("== Lines ==");
    nav.set_granularity(Granularity::Line);
    while let Step::Moved(_) = nav.next(&tree)? {
        println!("{}", nav.description(&tree).join(", "));
    }

    println!("== Words, backward ==");
    nav.set_granularity(Granularity::Word);
    while let Step::Moved(sel) = nav.previous(&tree)? {
        print!("{} ", sel.get_text(&tree));
    }
    println!();

    println!("== Form fields ==");
    if let Step::Moved(_) = nav.find(&tree, &predicates::form_field(), Direction::Forward, false)? {
        nav.set_granularity(Granularity::Object);
        println!("{}", nav.description(&tree).join(", "));
        if let Some(braille) = nav.braille(&tree) {
            println!("braille: {:?} [{}..{}]", braille.text.text(), braille.start_index, braille.end_index);
            println!("wire: {}", braille.to_json(&registry)?);
        }
    }

    Ok(())
}
