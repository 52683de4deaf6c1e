//! End-to-end unit-of-work semantics over the embedded repository.

use std::sync::Arc;

use strata::repository::{EmbeddedRepository, Repository, SchemaRecord};
use strata::txn::{BoxError, TransactionRunner};

fn setup() -> (Arc<EmbeddedRepository>, TransactionRunner) {
    let repo = Arc::new(EmbeddedRepository::in_memory().unwrap());
    let runner = TransactionRunner::new(repo.clone());
    (repo, runner)
}

async fn committed_record(
    repo: &Arc<EmbeddedRepository>,
    runner: &TransactionRunner,
    id: &str,
) -> Option<SchemaRecord> {
    let repo = repo.clone();
    let id = id.to_string();
    runner
        .run_in_transaction("read_back", true, move |uow| async move {
            Ok::<_, BoxError>(repo.find_schema(&uow, &id).await?)
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn committed_writes_become_visible_to_later_transactions() {
    let (repo, runner) = setup();

    let work_repo = repo.clone();
    runner
        .run_in_transaction("store_schema", false, move |uow| async move {
            work_repo
                .upsert_schema(&uow, SchemaRecord::new("pg_sales", "pg_sales", "CREATE ..."))
                .await?;
            Ok::<_, BoxError>(())
        })
        .await
        .unwrap();

    let record = committed_record(&repo, &runner, "pg_sales").await;
    assert_eq!(record.map(|r| r.ddl), Some("CREATE ...".to_string()));
}

#[tokio::test]
async fn failed_work_leaves_the_store_unchanged() {
    let (repo, runner) = setup();

    let work_repo = repo.clone();
    let err = runner
        .run_in_transaction("doomed", false, move |uow| async move {
            work_repo
                .upsert_schema(&uow, SchemaRecord::new("orphan", "orphan", "CREATE ..."))
                .await?;
            Err::<(), BoxError>("deploy rejected".into())
        })
        .await
        .unwrap_err();

    assert_eq!(
        format!("{}", err),
        "transaction work failed: deploy rejected"
    );
    assert_eq!(committed_record(&repo, &runner, "orphan").await, None);
}

#[tokio::test]
async fn rollback_only_transaction_succeeds_but_stores_nothing() {
    let (repo, runner) = setup();

    let work_repo = repo.clone();
    let echoed = runner
        .run_in_transaction("dry_run", true, move |uow| async move {
            work_repo
                .upsert_schema(&uow, SchemaRecord::new("dry", "dry", "CREATE ..."))
                .await?;
            // Within the transaction the staged write is readable.
            let staged = work_repo.find_schema(&uow, "dry").await?;
            Ok::<_, BoxError>(staged.is_some())
        })
        .await
        .unwrap();

    assert!(echoed);
    assert_eq!(committed_record(&repo, &runner, "dry").await, None);
}

#[tokio::test]
async fn staged_writes_are_invisible_to_concurrent_transactions() {
    let (repo, runner) = setup();

    let writer_repo = repo.clone();
    let observer_repo = repo.clone();
    let observer_runner = TransactionRunner::new(repo.clone());

    runner
        .run_in_transaction("writer", false, move |uow| async move {
            writer_repo
                .upsert_schema(&uow, SchemaRecord::new("shared", "shared", "CREATE ..."))
                .await?;

            // A second transaction running while this one is still open
            // must not see the staged record.
            let seen = observer_runner
                .run_in_transaction("observer", true, move |observer_uow| async move {
                    Ok::<_, BoxError>(
                        observer_repo.find_schema(&observer_uow, "shared").await?,
                    )
                })
                .await?;
            assert_eq!(seen, None);

            Ok::<_, BoxError>(())
        })
        .await
        .unwrap();

    assert!(committed_record(&repo, &runner, "shared").await.is_some());
}

#[tokio::test]
async fn delete_reports_whether_a_record_was_visible() {
    let (repo, runner) = setup();

    let seed_repo = repo.clone();
    runner
        .run_in_transaction("seed", false, move |uow| async move {
            seed_repo
                .upsert_schema(&uow, SchemaRecord::new("victim", "victim", "CREATE ..."))
                .await?;
            Ok::<_, BoxError>(())
        })
        .await
        .unwrap();

    let delete_repo = repo.clone();
    let (first, second) = runner
        .run_in_transaction("delete", false, move |uow| async move {
            let first = delete_repo.delete_schema(&uow, "victim").await?;
            let second = delete_repo.delete_schema(&uow, "victim").await?;
            Ok::<_, BoxError>((first, second))
        })
        .await
        .unwrap();

    assert!(first);
    assert!(!second);
    assert_eq!(committed_record(&repo, &runner, "victim").await, None);
}
