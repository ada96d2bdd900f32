use dayboard_core::db::open_db_in_memory;
use dayboard_core::{
    AddPersonOutcome, BoardConfig, BoardSession, CollapseOutcome, ColumnId, ColumnRejection,
    DayEdit, PersonId, PrintError, PrintScope, PrintSink, RepoError, RepoResult, SessionError,
    SqliteStateRepository, StateRepository, TimerSlot, COLLAPSE_STORAGE_KEY,
};
use rusqlite::Connection;
use std::cell::Cell;
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingSink {
    pages: Vec<String>,
}

impl PrintSink for RecordingSink {
    fn print(&mut self, html: &str) -> Result<(), PrintError> {
        self.pages.push(html.to_string());
        Ok(())
    }
}

struct BrokenSink;

impl PrintSink for BrokenSink {
    fn print(&mut self, _html: &str) -> Result<(), PrintError> {
        Err(PrintError::Unavailable)
    }
}

/// Delegates to SQLite but can be told to reject collapse-flag writes.
struct CollapseWriteFails<'conn> {
    inner: SqliteStateRepository<'conn>,
    failing: Cell<bool>,
}

impl StateRepository for CollapseWriteFails<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get_value(key)
    }

    fn put_value(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.failing.get() && key == COLLAPSE_STORAGE_KEY {
            return Err(RepoError::from(rusqlite::Error::ExecuteReturnedResults));
        }
        self.inner.put_value(key, value)
    }

    fn delete_value(&self, key: &str) -> RepoResult<bool> {
        self.inner.delete_value(key)
    }
}

fn open_session(conn: &Connection) -> BoardSession<SqliteStateRepository<'_>> {
    let repo = SqliteStateRepository::try_new(conn).unwrap();
    BoardSession::open(repo, BoardConfig::default()).unwrap()
}

fn add<R: StateRepository>(session: &mut BoardSession<R>, name: &str) -> PersonId {
    match session.add_person(name, Instant::now()).unwrap() {
        AddPersonOutcome::Added(id) => id,
        other => panic!("expected Added, got {other:?}"),
    }
}

#[test]
fn duplicate_highlight_expires_and_is_cleared_by_next_mutation() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let start = Instant::now();
    let alice = add(&mut session, "Alice");

    let outcome = session.add_person("ALICE ", start).unwrap();
    assert_eq!(
        outcome,
        AddPersonOutcome::DuplicateName {
            existing: alice.clone()
        }
    );
    assert_eq!(session.board().roster().person_count(), 1);
    assert_eq!(session.snapshot().highlighted, Some(alice.clone()));

    let fired = session.tick(start + Duration::from_millis(999), &mut RecordingSink::default());
    assert!(fired.is_empty());
    let fired = session.tick(start + Duration::from_secs(1), &mut RecordingSink::default());
    assert_eq!(fired, [TimerSlot::Highlight]);
    assert!(session.snapshot().highlighted.is_none());

    session.add_person("alice", start).unwrap();
    assert!(session.snapshot().highlighted.is_some());
    add(&mut session, "Bob");
    assert!(session.snapshot().highlighted.is_none());
}

#[test]
fn assigning_from_menu_migrates_person_and_closes_menu() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let day1 = session.add_column(None).unwrap();
    let day2 = session.add_column(None).unwrap();
    let pat = add(&mut session, "Pat");
    add(&mut session, "Quinn");

    assert_eq!(session.toggle_menu(&day1), Some(&day1));
    assert_eq!(session.menu_candidates().len(), 2);
    session.assign_person(&day1, &pat).unwrap();
    assert!(session.snapshot().active_menu.is_none());
    assert_eq!(session.menu_candidates().len(), 1);
    assert_eq!(session.day_badge(&pat).map(|c| c.title.as_str()), Some("#1 Day"));

    session.toggle_menu(&day2);
    session.assign_person(&day2, &pat).unwrap();
    assert!(!session.board().column(&day1).unwrap().contains(&pat));
    assert!(session.board().column(&day2).unwrap().contains(&pat));

    let err = session.assign_person(&ColumnId::roster(), &pat).unwrap_err();
    assert!(matches!(err, SessionError::Assignment(_)));
}

#[test]
fn menu_ignores_roster_and_closes_on_outside_press() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let day1 = session.add_column(None).unwrap();

    assert_eq!(session.toggle_menu(&ColumnId::roster()), None);
    session.toggle_menu(&day1);
    assert!(!session.pointer_down(Some(&day1)));
    assert!(session.pointer_down(None));
    assert!(session.snapshot().active_menu.is_none());
}

#[test]
fn collapse_toggles_only_populated_day_columns() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let start = Instant::now();
    let day1 = session.add_column(None).unwrap();

    let outcome = session.toggle_collapse(&day1, start).unwrap();
    assert_eq!(outcome, CollapseOutcome::EmptyNotice { shown: true });
    assert_eq!(session.transient().notice_text(&day1), Some("No customer here"));
    let outcome = session
        .toggle_collapse(&day1, start + Duration::from_millis(500))
        .unwrap();
    assert_eq!(outcome, CollapseOutcome::EmptyNotice { shown: false });
    assert!(!session.collapse_flags().is_collapsed(&day1));

    session.tick(start + Duration::from_secs(1), &mut RecordingSink::default());
    assert!(session.snapshot().notices.is_empty());

    let pat = add(&mut session, "Pat");
    session.assign_person(&day1, &pat).unwrap();
    let outcome = session.toggle_collapse(&day1, start).unwrap();
    assert_eq!(outcome, CollapseOutcome::Toggled { collapsed: true });
    assert!(session.collapse_flags().is_collapsed(&day1));

    let outcome = session.toggle_collapse(&ColumnId::roster(), start).unwrap();
    assert_eq!(outcome, CollapseOutcome::Ignored);
}

#[test]
fn renumber_moves_people_collapse_flag_and_menu() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let day1 = session.add_column(None).unwrap();
    session.add_column(None).unwrap();
    let pat = add(&mut session, "Pat");
    session.assign_person(&day1, &pat).unwrap();
    session.toggle_collapse(&day1, Instant::now()).unwrap();
    session.toggle_menu(&day1);

    assert!(session.begin_day_edit(&day1));
    session.set_day_draft(Some(2));
    let err = session.save_day_edit().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Column(ColumnRejection::ColumnNumberCollision(2))
    ));
    assert_eq!(
        session.day_edit(),
        &DayEdit::Editing {
            column: day1.clone(),
            draft: Some(2)
        }
    );

    session.set_day_draft(Some(5));
    let new_id = session.save_day_edit().unwrap().unwrap();
    assert_eq!(new_id, ColumnId::for_day(5));
    assert_eq!(session.day_edit(), &DayEdit::Viewing);

    let days: Vec<_> = session.board().day_numbers().collect();
    assert_eq!(days, [2, 5]);
    assert!(session.board().column(&new_id).unwrap().contains(&pat));
    assert!(session.collapse_flags().is_collapsed(&new_id));
    assert!(!session.collapse_flags().is_collapsed(&day1));
    assert_eq!(session.snapshot().active_menu, Some(new_id));
}

#[test]
fn cancel_discards_draft_without_touching_board() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let day1 = session.add_column(None).unwrap();
    let before = session.board().clone();

    session.begin_day_edit(&day1);
    session.set_day_draft(Some(8));
    session.cancel_day_edit();
    assert_eq!(session.day_edit(), &DayEdit::Viewing);
    assert_eq!(session.save_day_edit().unwrap(), None);
    assert_eq!(session.board(), &before);
}

#[test]
fn removing_column_unassigns_people_and_drops_column_state() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let day1 = session.add_column(None).unwrap();
    let pat = add(&mut session, "Pat");
    session.assign_person(&day1, &pat).unwrap();
    session.toggle_collapse(&day1, Instant::now()).unwrap();
    session.toggle_menu(&day1);
    session.begin_day_edit(&day1);

    session.remove_column(&day1).unwrap();
    assert!(session.board().day_columns().is_empty());
    assert!(session.board().person(&pat).is_some());
    assert!(session.collapse_flags().is_empty());
    assert!(session.snapshot().active_menu.is_none());
    assert_eq!(session.day_edit(), &DayEdit::Viewing);
}

#[test]
fn add_day_form_keeps_draft_on_collision() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    session.add_column(Some(3)).unwrap();

    session.set_add_day_draft(Some(3));
    let err = session.submit_add_day().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Column(ColumnRejection::ColumnNumberCollision(3))
    ));
    assert_eq!(session.add_day_draft(), Some(3));

    session.set_add_day_draft(Some(1));
    assert_eq!(session.submit_add_day().unwrap(), ColumnId::for_day(1));
    assert_eq!(session.add_day_draft(), None);

    assert_eq!(session.submit_add_day().unwrap(), ColumnId::for_day(4));
}

#[test]
fn state_survives_reopening_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");
    let pat;
    {
        let conn = dayboard_core::db::open_db(&path).unwrap();
        let mut session = open_session(&conn);
        let day = session.add_column(Some(2)).unwrap();
        pat = add(&mut session, "Pat");
        session.assign_person(&day, &pat).unwrap();
        session.toggle_collapse(&day, Instant::now()).unwrap();
    }

    let conn = dayboard_core::db::open_db(&path).unwrap();
    let mut session = open_session(&conn);
    let day = ColumnId::for_day(2);
    assert!(session.board().column(&day).unwrap().contains(&pat));
    assert!(session.collapse_flags().is_collapsed(&day));

    session.remove_person(&pat).unwrap();
    assert!(session
        .board()
        .columns()
        .iter()
        .all(|column| !column.contains(&pat)));
}

#[test]
fn print_is_dispatched_after_settle_delay() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let start = Instant::now();
    let day1 = session.add_column(None).unwrap();
    let pat = add(&mut session, "Pat");
    session.assign_person(&day1, &pat).unwrap();

    let mut sink = RecordingSink::default();
    assert!(session.request_print(PrintScope::RosterWith(day1.clone()), start));
    session.tick(start + Duration::from_millis(499), &mut sink);
    assert!(sink.pages.is_empty());

    let fired = session.tick(start + Duration::from_millis(500), &mut sink);
    assert_eq!(fired, [TimerSlot::Print]);
    assert_eq!(sink.pages.len(), 1);
    assert!(sink.pages[0].contains("#1 Day"));
    assert!(session.pending_print().is_none());

    assert!(!session.request_print(PrintScope::RosterWith(ColumnId::for_day(9)), start));
    assert!(session.print_deadline().is_none());
    session.tick(start + Duration::from_secs(1), &mut sink);
    assert_eq!(sink.pages.len(), 1);
}

#[test]
fn print_shows_board_as_it_was_when_requested() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let start = Instant::now();
    add(&mut session, "Pat");

    assert!(session.request_print(PrintScope::All, start));
    add(&mut session, "Quinn");
    assert_eq!(session.pending_print().unwrap().columns[0].count, 1);

    let mut sink = RecordingSink::default();
    session.tick(start + Duration::from_millis(500), &mut sink);
    assert_eq!(sink.pages.len(), 1);
    assert!(sink.pages[0].contains("Pat"));
    assert!(!sink.pages[0].contains("Quinn"));
}

#[test]
fn failed_collapse_write_still_moves_column_state_in_memory() {
    let conn = open_db_in_memory().unwrap();
    let repo = CollapseWriteFails {
        inner: SqliteStateRepository::try_new(&conn).unwrap(),
        failing: Cell::new(false),
    };
    let mut session = BoardSession::open(repo, BoardConfig::default()).unwrap();
    let day1 = session.add_column(None).unwrap();
    let day2 = session.add_column(None).unwrap();
    let pat = add(&mut session, "Pat");
    let quinn = add(&mut session, "Quinn");
    session.assign_person(&day1, &pat).unwrap();
    session.assign_person(&day2, &quinn).unwrap();
    session.toggle_collapse(&day1, Instant::now()).unwrap();
    session.toggle_collapse(&day2, Instant::now()).unwrap();
    session.toggle_menu(&day1);
    session.store().repository().failing.set(true);

    session.begin_day_edit(&day1);
    session.set_day_draft(Some(5));
    let err = session.save_day_edit().unwrap_err();
    assert!(matches!(err, SessionError::Repo(_)));

    let day5 = ColumnId::for_day(5);
    let days: Vec<_> = session.board().day_numbers().collect();
    assert_eq!(days, [2, 5]);
    assert!(session.collapse_flags().is_collapsed(&day5));
    assert!(!session.collapse_flags().is_collapsed(&day1));
    assert_eq!(session.snapshot().active_menu, Some(day5.clone()));
    assert_eq!(session.day_edit(), &DayEdit::Viewing);

    assert!(session.remove_column(&day2).is_err());
    assert!(session.board().column(&day2).is_none());
    assert!(!session.collapse_flags().is_collapsed(&day2));
    assert_eq!(session.collapse_flags().len(), 1);
    drop(session);

    let mut reopened = open_session(&conn);
    let days: Vec<_> = reopened.board().day_numbers().collect();
    assert_eq!(days, [5]);
    assert!(reopened.collapse_flags().is_empty());
    let day1 = reopened.add_column(Some(1)).unwrap();
    assert!(!reopened.collapse_flags().is_collapsed(&day1));
}

#[test]
fn auto_numbered_day_past_the_top_number_is_rejected_and_board_reloads() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let top = session.add_column(Some(u32::MAX)).unwrap();
    let pat = add(&mut session, "Pat");
    session.assign_person(&top, &pat).unwrap();

    let err = session.add_column(None).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Column(ColumnRejection::DayNumbersExhausted)
    ));

    let reopened = open_session(&conn);
    let days: Vec<_> = reopened.board().day_numbers().collect();
    assert_eq!(days, [u32::MAX]);
    assert!(reopened.board().column(&top).unwrap().contains(&pat));
}

#[test]
fn print_failures_do_not_change_state() {
    let conn = open_db_in_memory().unwrap();
    let mut session = open_session(&conn);
    let start = Instant::now();
    add(&mut session, "Pat");
    let before = session.board().clone();

    session.request_print(PrintScope::All, start);
    session.tick(start + Duration::from_secs(1), &mut BrokenSink);
    assert_eq!(session.board(), &before);
    assert!(session.pending_print().is_none());
}
