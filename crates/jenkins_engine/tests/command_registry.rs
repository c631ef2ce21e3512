use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jenkins_engine::{
    command_handler, CommandError, CommandHandler, CommandHost, CommandRegistration,
    CommandRegistry, CommandTable,
};
use pretty_assertions::assert_eq;

fn counting_handler(counter: &Arc<AtomicUsize>) -> CommandHandler {
    let counter = counter.clone();
    command_handler(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    })
}

#[tokio::test]
async fn added_command_is_executable() {
    let table = CommandTable::new();
    let mut registry = CommandRegistry::new(Arc::new(table.clone()));
    let calls = Arc::new(AtomicUsize::new(0));

    registry.add("jenkins.updateStatus", counting_handler(&calls));
    table.execute("jenkins.updateStatus").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.contains("jenkins.updateStatus"));
}

#[tokio::test]
async fn adding_same_id_replaces_previous_handler() {
    let table = CommandTable::new();
    let mut registry = CommandRegistry::new(Arc::new(table.clone()));
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    registry.add("cmd", counting_handler(&first));
    registry.add("cmd", counting_handler(&second));
    table.execute("cmd").await.unwrap();

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
    assert_eq!(table.ids(), vec!["cmd".to_string()]);
}

#[tokio::test]
async fn removed_command_is_gone_and_second_remove_is_noop() {
    let table = CommandTable::new();
    let mut registry = CommandRegistry::new(Arc::new(table.clone()));
    registry.add("cmd", counting_handler(&Arc::new(AtomicUsize::new(0))));

    registry.remove("cmd");
    registry.remove("cmd");
    registry.remove("never-added");

    assert!(registry.is_empty());
    assert!(!table.contains("cmd"));
    assert_eq!(
        table.execute("cmd").await,
        Err(CommandError::UnknownCommand("cmd".to_string()))
    );
}

#[tokio::test]
async fn dispose_all_empties_table_and_handlers_never_run_again() {
    let table = CommandTable::new();
    let mut registry = CommandRegistry::new(Arc::new(table.clone()));
    let calls = Arc::new(AtomicUsize::new(0));
    registry.add("a", counting_handler(&calls));
    registry.add("b", counting_handler(&calls));

    registry.dispose_all();
    registry.dispose_all();

    assert!(registry.is_empty());
    assert!(table.ids().is_empty());
    assert!(table.execute("a").await.is_err());
    assert!(table.execute("b").await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn dropping_registry_releases_registrations() {
    let table = CommandTable::new();
    {
        let mut registry = CommandRegistry::new(Arc::new(table.clone()));
        registry.add("a", counting_handler(&Arc::new(AtomicUsize::new(0))));
        assert!(table.contains("a"));
    }
    assert!(!table.contains("a"));
}

#[test]
fn stale_registration_does_not_remove_newer_one() {
    let table = CommandTable::new();
    let mut old = table.register("cmd", counting_handler(&Arc::new(AtomicUsize::new(0))));
    let _new = table.register("cmd", counting_handler(&Arc::new(AtomicUsize::new(0))));

    old.dispose();
    old.dispose();

    assert!(table.contains("cmd"));
}

#[test]
fn registries_sharing_a_table_are_independent() {
    let table = CommandTable::new();
    let mut first = CommandRegistry::new(Arc::new(table.clone()));
    let mut second = CommandRegistry::new(Arc::new(table.clone()));
    first.add("Jenkins.A.openInJenkins", counting_handler(&Arc::new(AtomicUsize::new(0))));
    second.add("Jenkins.B.openInJenkins", counting_handler(&Arc::new(AtomicUsize::new(0))));

    first.dispose_all();

    assert_eq!(table.ids(), vec!["Jenkins.B.openInJenkins".to_string()]);
    assert_eq!(second.ids(), vec!["Jenkins.B.openInJenkins".to_string()]);
}
