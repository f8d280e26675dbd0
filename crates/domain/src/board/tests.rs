use chrono::NaiveDate;
use proptest::prelude::*;

use super::{Board, BoardColumnId, priority_label, task_key};
use crate::{TaskAssignee, TaskRecord, UserProfile};

fn record(id: i64, status_key: Option<&str>) -> TaskRecord {
    TaskRecord {
        id,
        title: format!("Task {id}"),
        description: None,
        project_id: Some(1),
        project_name: Some("Smart Sprint".to_owned()),
        status_key: status_key.map(str::to_owned),
        priority_key: None,
        task_type_key: None,
        assignees: Vec::new(),
        links_count: 0,
        comments_count: 0,
        due_date: None,
        progress_percentage: 0,
        created_at: None,
        updated_at: None,
    }
}

fn profile(id: i64, first_name: &str, last_name: &str) -> UserProfile {
    UserProfile {
        id,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        role_key: Some("frontend-developer".to_owned()),
        company: None,
        is_active: true,
        created_at: None,
        last_login: None,
    }
}

#[test]
fn records_are_bucketed_by_status_with_to_do_fallback() {
    let board = Board::build(
        &[],
        vec![
            record(1, Some("in-progress")),
            record(2, Some("done")),
            record(3, None),
            record(4, Some("archived")),
            record(5, Some("waiting-review")),
        ],
    );

    assert_eq!(
        board.column(BoardColumnId::ToDo).task_keys(),
        &["task-3".to_owned(), "task-4".to_owned()]
    );
    assert_eq!(
        board.column_of("task-1"),
        Some(BoardColumnId::InProgress)
    );
    assert_eq!(board.column_of("task-5"), Some(BoardColumnId::WaitingReview));
    assert_eq!(board.column(BoardColumnId::Testing).task_keys().len(), 0);
    assert_eq!(board.len(), 5);
    assert!(board.is_partitioned());
}

#[test]
fn card_fields_follow_display_defaults() {
    let mut full = record(7, Some("testing"));
    full.description = Some("Wire the login form".to_owned());
    full.priority_key = Some("high".to_owned());
    full.task_type_key = Some("frontend".to_owned());
    full.due_date = NaiveDate::from_ymd_opt(2024, 1, 5);
    full.progress_percentage = 59;
    full.comments_count = 3;
    full.links_count = 2;

    let board = Board::build(&[], vec![full, record(8, None)]);

    let card = board.task("task-7").unwrap_or_else(|| unreachable!());
    assert_eq!(card.status, "Testing");
    assert_eq!(card.priority, "High");
    assert_eq!(card.due_date, "Jan 5, 2024");
    assert_eq!(card.progress, "2/5");
    assert_eq!(card.task_type, "frontend");
    assert_eq!(card.description, "Wire the login form");
    assert_eq!((card.comments, card.links), (3, 2));

    let bare = board.task("task-8").unwrap_or_else(|| unreachable!());
    assert_eq!(bare.status, "To Do");
    assert_eq!(bare.priority, "Medium");
    assert_eq!(bare.due_date, "No due date");
    assert_eq!(bare.progress, "0/5");
    assert_eq!(bare.task_type, "backend");
}

#[test]
fn unknown_assignees_are_added_from_task_data() {
    let mut task = record(1, Some("to-do"));
    task.assignees = vec![
        TaskAssignee {
            user_id: 1,
            user_name: Some("Davis Donin".to_owned()),
            user_email: None,
        },
        TaskAssignee {
            user_id: 9,
            user_name: Some("Grace Brewster Hopper".to_owned()),
            user_email: Some("grace@example.com".to_owned()),
        },
        TaskAssignee {
            user_id: 10,
            user_name: None,
            user_email: None,
        },
    ];

    let board = Board::build(&[profile(1, "Davis", "Donin")], vec![task]);

    let card = board.task("task-1").unwrap_or_else(|| unreachable!());
    assert_eq!(card.assignees, vec!["user-1", "user-9", "user-10"]);
    assert_eq!(board.users().len(), 3);
    assert_eq!(board.users()["user-1"].avatar, "DD");
    assert_eq!(board.users()["user-9"].name, "Grace Brewster Hopper");
    assert_eq!(board.users()["user-9"].avatar, "GB");
    assert_eq!(board.users()["user-10"].name, "Unknown");
    assert_eq!(board.users()["user-10"].avatar, "U");
}

#[test]
fn duplicate_ids_keep_the_last_record() {
    let board = Board::build(
        &[],
        vec![record(4, Some("to-do")), record(4, Some("done"))],
    );

    assert_eq!(board.len(), 1);
    assert_eq!(board.column_of("task-4"), Some(BoardColumnId::Done));
    assert!(board.is_partitioned());
}

#[test]
fn reload_replaces_the_previous_projection() {
    let first: Vec<_> = (1..=12).map(|id| record(id, Some("to-do"))).collect();
    let second: Vec<_> = (1..=10).map(|id| record(id, Some("done"))).collect();

    let before = Board::build(&[], first);
    assert_eq!(before.len(), 12);

    let after = Board::build(&[], second);
    assert_eq!(after.len(), 10);
    assert_eq!(after.column(BoardColumnId::Done).task_keys().len(), 10);
    assert!(after.task("task-11").is_none());
    assert!(after.is_partitioned());
}

#[test]
fn move_task_relocates_and_relabels() {
    let mut board = Board::build(&[], vec![record(1, Some("to-do")), record(2, Some("to-do"))]);

    let moved = board
        .move_task("task-1", BoardColumnId::ToDo, BoardColumnId::Testing)
        .unwrap_or_default();

    assert!(moved);
    assert_eq!(board.column_of("task-1"), Some(BoardColumnId::Testing));
    assert_eq!(
        board.task("task-1").map(|task| task.status.as_str()),
        Some("Testing")
    );
    assert_eq!(board.column(BoardColumnId::ToDo).task_keys(), &["task-2".to_owned()]);
    assert!(board.is_partitioned());
}

#[test]
fn move_task_to_same_column_is_a_no_op() {
    let mut board = Board::build(&[], vec![record(1, Some("done"))]);
    let before = board.clone();

    assert_eq!(
        board.move_task("task-1", BoardColumnId::Done, BoardColumnId::Done),
        Ok(false)
    );
    assert_eq!(
        board.move_task("task-1", BoardColumnId::ToDo, BoardColumnId::Done),
        Ok(false)
    );
    assert_eq!(board, before);
}

#[test]
fn move_task_uses_actual_column_as_source() {
    let mut board = Board::build(&[], vec![record(1, Some("in-progress"))]);

    assert_eq!(
        board.move_task("task-1", BoardColumnId::ToDo, BoardColumnId::Done),
        Ok(true)
    );
    assert!(board.column(BoardColumnId::InProgress).task_keys().is_empty());
    assert_eq!(board.column_of("task-1"), Some(BoardColumnId::Done));
}

#[test]
fn move_task_rejects_unknown_task() {
    let mut board = Board::build(&[], vec![record(1, None)]);
    let result = board.move_task("task-99", BoardColumnId::ToDo, BoardColumnId::Done);
    assert!(matches!(result, Err(smart_sprint_core::AppError::NotFound(_))));
}

#[test]
fn column_ids_parse_from_key_or_status() {
    assert_eq!("column-3".parse::<BoardColumnId>(), Ok(BoardColumnId::WaitingReview));
    assert_eq!("done".parse::<BoardColumnId>(), Ok(BoardColumnId::Done));
    assert!("column-9".parse::<BoardColumnId>().is_err());
    assert_eq!(BoardColumnId::Testing.status_color(), "#f97316");
    assert_eq!(priority_label(Some("low")), "Low");
    assert_eq!(priority_label(Some("urgent")), "Medium");
}

fn status_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("to-do".to_owned())),
        Just(Some("in-progress".to_owned())),
        Just(Some("waiting-review".to_owned())),
        Just(Some("testing".to_owned())),
        Just(Some("done".to_owned())),
        "[a-z-]{0,12}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn build_and_moves_keep_the_partition(
        tasks in prop::collection::vec((0_i64..20, status_strategy()), 0..30),
        moves in prop::collection::vec((0_i64..20, 0_usize..5, 0_usize..5), 0..20),
    ) {
        let records = tasks
            .into_iter()
            .map(|(id, status)| record(id, status.as_deref()))
            .collect();
        let mut board = Board::build(&[], records);
        prop_assert!(board.is_partitioned());

        let columns = BoardColumnId::all();
        for (id, from, to) in moves {
            let key = task_key(id);
            let known = board.task(&key).is_some();
            let result = board.move_task(&key, columns[from], columns[to]);
            prop_assert_eq!(result.is_ok(), known || from == to);
            prop_assert!(board.is_partitioned());
        }
    }
}
