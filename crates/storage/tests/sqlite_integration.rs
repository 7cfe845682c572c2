use quiz_core::model::{Question, QuizSession, QuizSet, SlotKey};
use quiz_core::time::fixed_now;
use storage::repository::{
    NotesRepository, QuizRepository, SessionRecord, SessionRepository, StorageError,
};
use storage::sqlite::SqliteRepository;

fn sample_quiz() -> QuizSet {
    QuizSet::new(vec![
        Question {
            prompt: "Q1".into(),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: "A".into(),
            explanation: "first".into(),
        },
        Question {
            prompt: "Q2".into(),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: "B".into(),
            explanation: "second".into(),
        },
    ])
    .unwrap()
}

fn slot() -> SlotKey {
    SlotKey::new("converted-mcq").unwrap()
}

#[tokio::test]
async fn sqlite_quiz_roundtrip_preserves_order_and_options() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = sample_quiz();
    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();

    let loaded = repo.load_quiz(&slot()).await.unwrap();
    assert_eq!(loaded, quiz);
}

#[tokio::test]
async fn sqlite_missing_quiz_is_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(matches!(
        repo.load_quiz(&slot()).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn sqlite_session_roundtrip_restores_engine_state() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_session?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = sample_quiz();
    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();

    let mut session = QuizSession::new(quiz.clone());
    session.select_answer("A").unwrap();
    session.submit_answer().unwrap();
    session.advance().unwrap();

    let record = SessionRecord::from_session(slot(), &session, fixed_now());
    repo.save_session(&record).await.unwrap();

    let loaded = repo.load_session(&slot()).await.unwrap();
    assert_eq!(loaded.current, 1);
    assert!(!loaded.complete);
    assert_eq!(loaded.updated_at, fixed_now());

    let restored = loaded.into_session(quiz).unwrap();
    assert_eq!(restored, session);
}

#[tokio::test]
async fn sqlite_replacing_quiz_cascades_into_session() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = sample_quiz();
    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();

    let session = QuizSession::new(quiz.clone());
    let record = SessionRecord::from_session(slot(), &session, fixed_now());
    repo.save_session(&record).await.unwrap();

    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();
    assert!(matches!(
        repo.load_session(&slot()).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn sqlite_rejects_rows_that_no_longer_form_a_valid_quiz() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = sample_quiz();
    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();

    // Tamper with the stored answer so it matches none of the options.
    sqlx::query("UPDATE questions SET answer = 'Z' WHERE slot = ?1 AND idx = 0")
        .bind(slot().as_str())
        .execute(repo.pool())
        .await
        .unwrap();

    assert!(matches!(
        repo.load_quiz(&slot()).await.unwrap_err(),
        StorageError::Serialization(_)
    ));
}

#[tokio::test]
async fn sqlite_delete_quiz_empties_the_slot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_delete?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = sample_quiz();
    repo.save_quiz(&slot(), &quiz, fixed_now()).await.unwrap();
    repo.delete_quiz(&slot()).await.unwrap();

    assert!(matches!(
        repo.load_quiz(&slot()).await.unwrap_err(),
        StorageError::NotFound
    ));

    // Deleting again is still fine.
    repo.delete_quiz(&slot()).await.unwrap();
}

#[tokio::test]
async fn sqlite_notes_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_notes?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_notes(&slot(), "first draft", fixed_now())
        .await
        .unwrap();
    repo.save_notes(&slot(), "second draft", fixed_now())
        .await
        .unwrap();

    assert_eq!(repo.load_notes(&slot()).await.unwrap(), "second draft");
}
