//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `vtree_core` linkage.
//! - Drive one scripted task list session against the in-memory surface and
//!   print the live outline after each reconciliation pass.

use vtree_core::{MemorySurface, Surface, SurfaceAction, TaskChange, TaskList, TaskListConfig};

fn main() {
    println!("vtree_core ping={}", vtree_core::ping());
    println!("vtree_core version={}", vtree_core::core_version());

    if let Ok(log_dir) = std::env::var("VTREE_LOG_DIR") {
        if let Err(err) = vtree_core::init_logging(vtree_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let surface = MemorySurface::new();
    let mount = surface.mount();
    let mut list = TaskList::new(TaskListConfig::default(), surface, mount);

    let milk = list.add_task("buy milk");
    report("add", &milk, &list);
    let bread = list.add_task("bake bread");
    report("add", &bread, &list);

    if let Some(id) = milk.outcome.node_id() {
        list.select(id);
    }
    let sub = list.add_sub_task("check the oat kind");
    report("sub-task", &sub, &list);

    let edit_request = milk
        .outcome
        .node_id()
        .and_then(|id| list.surface().lookup(id))
        .and_then(|handle| list.surface().trigger(handle, SurfaceAction::Edit));
    if let Some(request) = edit_request {
        let edited = list.handle_action(&request, Some("buy oat milk"));
        report("edit", &edited, &list);
    }

    if let Some(id) = bread.outcome.node_id().cloned() {
        let removed = list.remove_task(&id);
        report("remove", &removed, &list);
    }
}

fn report(step: &str, change: &TaskChange, list: &TaskList<MemorySurface>) {
    match &change.report {
        Some(pass) => println!(
            "{step}: {:?} created={} removed={} text={} attrs={}",
            change.outcome, pass.created, pass.removed, pass.text_updates, pass.attribute_updates
        ),
        None => println!("{step}: {:?} (no pass)", change.outcome),
    }
    print!("{}", list.surface().render_outline());
}
