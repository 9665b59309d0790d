mod common;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use common::{TestWorkspace, sample_csv};
use csv_wrangler::WranglerError;
use csv_wrangler::session::{Frontend, OpenOptions, SaveDecision, Session};

/// Queued prompt answers shared between a test and the session under test.
#[derive(Default)]
struct Script {
    decisions: VecDeque<SaveDecision>,
    open_paths: VecDeque<PathBuf>,
    save_paths: VecDeque<PathBuf>,
    text_answers: VecDeque<Option<String>>,
}

struct ScriptedFrontend(Rc<RefCell<Script>>);

impl Frontend for ScriptedFrontend {
    fn confirm_save(&mut self) -> SaveDecision {
        self.0
            .borrow_mut()
            .decisions
            .pop_front()
            .unwrap_or(SaveDecision::Abort)
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.0.borrow_mut().open_paths.pop_front()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.0.borrow_mut().save_paths.pop_front()
    }

    fn prompt_text(&mut self, _prompt: &str, _default: &str) -> Option<String> {
        self.0.borrow_mut().text_answers.pop_front().flatten()
    }
}

fn scripted() -> (Session, Rc<RefCell<Script>>) {
    let script = Rc::new(RefCell::new(Script::default()));
    let session = Session::new(Box::new(ScriptedFrontend(Rc::clone(&script))));
    (session, script)
}

#[test]
fn open_path_loads_and_binds_the_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let mut session = Session::headless();

    let status = session
        .open_path(&path, OpenOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(status.rows, 3);
    assert_eq!(status.columns, 3);
    assert!(session.has_table());
    assert_eq!(session.bound_path(), Some(path.as_path()));
}

#[test]
fn open_auto_detects_the_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("semi.csv", "a;b\n1;2\n");
    let mut session = Session::headless();

    session.open_path(&path, OpenOptions::default()).unwrap();
    assert_eq!(session.table().config().delimiter, ';');
    assert_eq!(session.table().column_names(), ["a", "b"]);
}

#[test]
fn open_without_headers_synthesizes_column_names() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("raw.csv", "1,Alice\n2,Bob\n");
    let mut session = Session::headless();

    session
        .open_path(
            &path,
            OpenOptions {
                delimiter: None,
                has_headers: false,
            },
        )
        .unwrap();
    assert_eq!(session.table().column_names(), ["Col 1", "Col 2"]);
    assert_eq!(session.table().row_count(), 2);
}

#[test]
fn opening_an_empty_file_is_a_validation_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("empty.csv", "");
    let mut session = Session::headless();

    let err = session
        .open_path(&path, OpenOptions::default())
        .unwrap_err();
    assert!(matches!(err, WranglerError::Validation(_)));
    assert!(!session.has_table());
}

#[test]
fn opening_a_missing_file_is_an_io_error() {
    let mut session = Session::headless();
    let err = session
        .open_path(Path::new("no/such/file.csv"), OpenOptions::default())
        .unwrap_err();
    assert!(matches!(err, WranglerError::Io { .. }));
}

#[test]
fn new_table_starts_with_one_empty_row_and_no_path() {
    let mut session = Session::headless();
    let status = session
        .new_table(vec!["a".into(), "b".into()])
        .unwrap()
        .unwrap();
    assert_eq!(status.rows, 1);
    assert_eq!(status.columns, 2);
    assert_eq!(session.table().rows()[0], vec![None, None]);
    assert!(session.bound_path().is_none());

    // The headless frontend aborts the guard, so a second table is refused.
    let outcome = session.new_table(vec!["c".into()]).unwrap();
    assert!(outcome.is_none());
    assert_eq!(session.table().column_names(), ["a", "b"]);
}

#[test]
fn new_table_requires_at_least_one_name() {
    let mut session = Session::headless();
    let err = session.new_table(Vec::new()).unwrap_err();
    assert!(matches!(err, WranglerError::Validation(_)));
}

#[test]
fn save_rewrites_the_bound_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let mut session = Session::headless();
    session.open_path(&path, OpenOptions::default()).unwrap();

    session
        .table_mut()
        .set_value(0, 1, Some("Alma".into()))
        .unwrap();
    session.save().unwrap().unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("1,Alma,42.5"));
}

#[test]
fn save_to_switches_delimiter_and_rebinds() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let out = workspace.path().join("out.csv");
    let mut session = Session::headless();
    session.open_path(&path, OpenOptions::default()).unwrap();

    let status = session.save_to(&out, Some(';')).unwrap();
    assert_eq!(status.message, format!("Saved {}", out.display()));
    assert_eq!(session.bound_path(), Some(out.as_path()));
    assert_eq!(session.table().config().delimiter, ';');

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("id;name;amount\n1;Alice;42.5\n"));
}

#[test]
fn abort_answer_keeps_the_current_table() {
    let workspace = TestWorkspace::new();
    let first = workspace.write("first.csv", sample_csv());
    let second = workspace.write("second.csv", "a,b\n1,2\n");
    let (mut session, script) = scripted();
    session.open_path(&first, OpenOptions::default()).unwrap();

    script
        .borrow_mut()
        .decisions
        .push_back(SaveDecision::Abort);
    let outcome = session.open_path(&second, OpenOptions::default()).unwrap();
    assert!(outcome.is_none());
    assert_eq!(session.bound_path(), Some(first.as_path()));
    assert_eq!(session.table().row_count(), 3);
}

#[test]
fn discard_answer_proceeds_without_writing() {
    let workspace = TestWorkspace::new();
    let first = workspace.write("first.csv", sample_csv());
    let second = workspace.write("second.csv", "a,b\n1,2\n");
    let (mut session, script) = scripted();
    session.open_path(&first, OpenOptions::default()).unwrap();
    session
        .table_mut()
        .set_value(0, 1, Some("Edited".into()))
        .unwrap();

    script
        .borrow_mut()
        .decisions
        .push_back(SaveDecision::Discard);
    session
        .open_path(&second, OpenOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(session.bound_path(), Some(second.as_path()));
    assert_eq!(workspace.read("first.csv"), sample_csv());
}

#[test]
fn save_answer_writes_before_proceeding() {
    let workspace = TestWorkspace::new();
    let first = workspace.write("first.csv", sample_csv());
    let second = workspace.write("second.csv", "a,b\n1,2\n");
    let (mut session, script) = scripted();
    session.open_path(&first, OpenOptions::default()).unwrap();
    session
        .table_mut()
        .set_value(0, 1, Some("Edited".into()))
        .unwrap();

    script.borrow_mut().decisions.push_back(SaveDecision::Save);
    session
        .open_path(&second, OpenOptions::default())
        .unwrap()
        .unwrap();
    assert!(workspace.read("first.csv").contains("Edited"));
}

#[test]
fn save_answer_with_cancelled_picker_blocks_the_operation() {
    let (mut session, script) = scripted();
    session.new_table(vec!["a".into()]).unwrap();

    // Save is chosen, but the table has no bound path and the save-as
    // prompts are left unanswered, so nothing may be discarded.
    script.borrow_mut().decisions.push_back(SaveDecision::Save);
    let outcome = session.close().unwrap();
    assert!(outcome.is_none());
    assert!(session.has_table());
}

#[test]
fn interactive_open_asks_the_frontend_for_a_path() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let (mut session, script) = scripted();

    let cancelled = session.open().unwrap();
    assert!(cancelled.is_none());

    script.borrow_mut().open_paths.push_back(path.clone());
    let status = session.open().unwrap().unwrap();
    assert_eq!(status.rows, 3);
    assert_eq!(session.bound_path(), Some(path.as_path()));
}

#[test]
fn save_as_takes_the_first_character_of_the_delimiter_answer() {
    let workspace = TestWorkspace::new();
    let out = workspace.path().join("out.csv");
    let (mut session, script) = scripted();
    session.new_table(vec!["a".into(), "b".into()]).unwrap();

    {
        let mut script = script.borrow_mut();
        script.text_answers.push_back(Some("; extra".into()));
        script.save_paths.push_back(out.clone());
    }
    session.save_as().unwrap().unwrap();
    assert_eq!(workspace.read("out.csv"), "a;b\n;\n");
    assert_eq!(session.table().config().delimiter, ';');
}

#[test]
fn cancelled_delimiter_prompt_keeps_the_current_delimiter() {
    let workspace = TestWorkspace::new();
    let out = workspace.path().join("out.csv");
    let (mut session, script) = scripted();
    session.new_table(vec!["a".into(), "b".into()]).unwrap();

    {
        let mut script = script.borrow_mut();
        script.text_answers.push_back(None);
        script.save_paths.push_back(out.clone());
    }
    session.save_as().unwrap().unwrap();
    assert_eq!(workspace.read("out.csv"), "a,b\n,\n");
    assert_eq!(session.table().config().delimiter, ',');
}

#[test]
fn close_resets_table_and_path() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let (mut session, script) = scripted();
    session.open_path(&path, OpenOptions::default()).unwrap();

    script
        .borrow_mut()
        .decisions
        .push_back(SaveDecision::Discard);
    session.close().unwrap().unwrap();
    assert!(!session.has_table());
    assert!(session.bound_path().is_none());
    assert_eq!(session.table().row_count(), 0);
}

#[test]
fn row_edits_report_status_counts() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let mut session = Session::headless();
    session.open_path(&path, OpenOptions::default()).unwrap();

    let status = session.add_row().unwrap();
    assert_eq!(status.rows, 4);

    let err = session.delete_rows(&[]).unwrap_err();
    assert!(matches!(err, WranglerError::Validation(_)));

    let status = session.delete_rows(&[0, 2]).unwrap();
    assert_eq!(status.message, "Deleted 2 row(s)");
    assert_eq!(status.rows, 2);
}

#[test]
fn filter_and_clear_round_trip_through_the_session() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("in.csv", sample_csv());
    let mut session = Session::headless();
    session.open_path(&path, OpenOptions::default()).unwrap();

    let status = session.filter("name", "starts-with", "Ali").unwrap();
    assert_eq!(status.message, "Filter kept 2 row(s)");
    assert_eq!(status.rows, 2);

    let status = session.clear_filter().unwrap();
    assert_eq!(status.rows, 3);
}
