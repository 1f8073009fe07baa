use std::time::{SystemTime, UNIX_EPOCH};

use turso_platform_http::{ConfigError, TursoClient, TursoError};

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock must be after epoch")
        .as_millis()
}

#[tokio::test]
async fn live_read_only_tour() -> anyhow::Result<()> {
    let turso = match TursoClient::from_env() {
        Ok(client) => client,
        Err(TursoError::Config(ConfigError::MissingEnv(name))) => {
            eprintln!("skipping live test: {name} not set");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let user = turso.users().current().await?;
    assert!(!user.username.is_empty());

    let locations = turso.locations().list().await?;
    assert!(!locations.is_empty());

    let closest = turso.locations().closest().await?;
    assert!(!closest.is_empty());

    turso.tokens().validate().await?;

    turso.databases().list().await?;

    let missing = format!("missing-{}", unique_suffix());
    let err = turso
        .groups()
        .get(&missing)
        .await
        .expect_err("random group must not exist");
    assert!(matches!(err, TursoError::NotFound { .. }), "got {err:?}");

    Ok(())
}
