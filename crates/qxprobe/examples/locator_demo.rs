//! Locator Demo - Widget-aware Element Selection
//!
//! Demonstrates the Qxprobe locator strategies and click commands against an
//! in-memory widget snapshot.
//!
//! # Running
//!
//! ```bash
//! cargo run --example locator_demo -p qxprobe
//! ```
//!
//! # Features
//!
//! - User-tag locators (`qx=`, `qxx=`)
//! - Hierarchy locators with wildcards, classes, indices and attributes (`qxh=`)
//! - Click sequence and enabled-state query on a recording host

#![allow(
    clippy::uninlined_format_args,
    clippy::std_instead_of_core,
    clippy::unwrap_used
)]

use qxprobe::mock::MockEventHost;
use qxprobe::{Dispatcher, Locator, Path, QxCommands, WidgetSnapshot};

const SNAPSHOT: &str = r#"
location: http://localhost/demo/index.html
application: app
clientDocument: doc
classes:
  qx.ui.core.Widget: { properties: [enabled] }
  qx.ui.form.Button: { extends: qx.ui.core.Widget, properties: [label] }
  qx.ui.toolbar.ToolBar: { extends: qx.ui.core.Widget }
nodes:
  app: { members: { toolbar: { $ref: toolbar } } }
  doc: { class: qx.ui.core.Widget, enabled: enabled, children: [ { $ref: toolbar } ] }
  toolbar:
    class: qx.ui.toolbar.ToolBar
    element: toolbarDiv
    userData: { toolbar: true }
    children: [ { $ref: open }, { $ref: save }, { $ref: quit } ]
  open: { class: qx.ui.form.Button, element: openDiv, enabled: inherit, properties: { label: Open }, userData: { open: true } }
  save: { class: qx.ui.form.Button, element: saveDiv, enabled: disabled, properties: { label: Save }, userData: { save: true } }
  quit:
    class: qx.ui.form.Button
    element: quitDiv
    executable: true
    properties: { label: Quit }
    userData: { quit: true }
"#;

fn main() {
    println!("=== Qxprobe Locator Demo ===\n");

    let snapshot = WidgetSnapshot::from_yaml_str(SNAPSHOT).unwrap();
    println!("Loaded {}\n", snapshot);

    // Demo 1: Path parsing
    demo_paths();

    // Demo 2: Locating elements
    demo_locators(&snapshot);

    // Demo 3: Commands on a recording host
    demo_commands(snapshot);

    println!("\n=== Locator Demo Complete ===");
}

fn demo_paths() {
    println!("--- Demo 1: Hierarchy Paths ---\n");

    for text in [
        "toolbar/child[2]",
        "*/qx.ui.form.Button",
        "*/[@label=\"Qu.*\"]",
        "1bad/x",
    ] {
        match Path::parse(text) {
            Ok(path) => println!("{:<24} -> {:?}", text, path.steps()),
            Err(err) => println!("{:<24} -> {}", text, err),
        }
    }
    println!();
}

fn demo_locators(snapshot: &WidgetSnapshot) {
    println!("--- Demo 2: Locators ---\n");

    let dispatcher = Dispatcher::new(snapshot);
    for locator in [
        "qx=toolbar/quit",
        "qxh=app:toolbar/child[1]",
        "qxh=*/[@label=Open]",
        "qxh=qx.ui.toolbar.ToolBar/qx.ui.form.Button",
        "qxh=*/missing",
        "id=toolbarDiv",
    ] {
        let kind = match Locator::parse(locator).unwrap() {
            Locator::Qx(_) => "qx",
            Locator::Native(_) => "native",
        };
        println!(
            "{:<46} [{}] -> {:?}",
            locator,
            kind,
            dispatcher.find_element(locator).unwrap()
        );
    }
    println!();
}

fn demo_commands(snapshot: WidgetSnapshot) {
    println!("--- Demo 3: Commands ---\n");

    let host = MockEventHost::new(snapshot).with_client_position("quitDiv", 320, 12);
    let commands = QxCommands::new(&host);

    commands
        .qx_click_at("qx=toolbar/quit", "button=left, shiftKey=true")
        .unwrap();
    println!("Events fired: {:?}", host.mouse_event_types());

    commands.qx_execute("qx=quit").unwrap();
    println!("Recorded {} events in total", host.events().len());

    for locator in ["qx=toolbar/open", "qx=toolbar/save"] {
        println!(
            "isQxEnabled({}) = {}",
            locator,
            commands.is_qx_enabled(locator).unwrap()
        );
    }
}
