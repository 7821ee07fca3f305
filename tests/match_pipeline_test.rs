use dsp_marketplace::core::MatchReport;
use dsp_marketplace::matching::MatchingConfig;
use dsp_marketplace::utils::validation::Validate;
use dsp_marketplace::{
    ApiClient, AppConfig, JsonFileSource, LocalStorage, MarketplaceError, MatchEngine,
    ShiftMatchPipeline,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn worker_profile() -> serde_json::Value {
    json!({
        "id": "w-42",
        "name": "Dana Reyes",
        "certifications": ["CPR Certification", "First Aid"],
        "skills": ["medication administration"],
        "preferences": {
            "maxDistanceMiles": 25.0,
            "payRange": {"min": 20.0, "max": 35.0}
        }
    })
}

fn open_shifts() -> serde_json::Value {
    json!([
        {
            "id": "s-near",
            "title": "Residential support",
            "clientName": "Maple House",
            "startsAt": "2026-11-02T08:00:00Z",
            "endsAt": "2026-11-02T16:00:00Z",
            "hourlyRate": 24.0,
            "shiftType": "day",
            "requiredCredentials": ["CPR Certification", "First Aid"],
            "distanceMiles": 2.5
        },
        {
            "id": "s-rn",
            "title": "Skilled nursing visit",
            "startsAt": "2026-11-03T08:00:00Z",
            "endsAt": "2026-11-03T12:00:00Z",
            "hourlyRate": 48.0,
            "shiftType": "day",
            "requiredCredentials": ["RN License"],
            "distanceMiles": 40.0
        }
    ])
}

fn config_for(server: &MockServer, output_path: &str) -> anyhow::Result<AppConfig> {
    let toml = format!(
        r#"
[api]
base_url = "{}"
token = "pipeline-token"
timeout_seconds = 5

[worker]
id = "w-42"

[matching]
min_score = 60
top_n = 5

[output]
output_path = "{}"
filename = "matches.json"
"#,
        server.base_url(),
        output_path
    );
    let config = AppConfig::from_toml_str(&toml)?;
    config.validate()?;
    Ok(config)
}

#[tokio::test]
async fn test_end_to_end_match_run_against_api() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    let profile_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/workers/w-42/profile")
                .header("Authorization", "Bearer pipeline-token");
            then.status(200).json_body(worker_profile());
        })
        .await;
    let shifts_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/shifts").query_param("status", "open");
            then.status(200).json_body(open_shifts());
        })
        .await;

    let config = config_for(&server, &output_path)?;
    let client = ApiClient::with_timeout(
        &config.api.base_url,
        config.token().unwrap_or_default(),
        config.request_timeout(),
    )?;
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ShiftMatchPipeline::new(client, storage, config);
    let engine = MatchEngine::new_with_monitoring(pipeline, false);

    let written = engine.run().await?;

    profile_mock.assert_async().await;
    shifts_mock.assert_async().await;
    assert!(written.ends_with("matches.json"));

    let full_path = temp_dir.path().join("matches.json");
    assert!(full_path.exists());
    let report: MatchReport = serde_json::from_slice(&std::fs::read(&full_path)?)?;

    assert_eq!(report.worker_id, "w-42");
    assert_eq!(report.shifts_considered, 2);
    assert_eq!(report.matches.len(), 1);
    let top = &report.matches[0];
    assert_eq!(top.rank, 1);
    assert_eq!(top.shift.id, "s-near");
    assert!(top.score >= 80);
    assert!(top
        .reasons
        .iter()
        .any(|r| r.starts_with("Certification match")));
    Ok(())
}

#[tokio::test]
async fn test_expired_token_stops_before_writing() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workers/w-42/profile");
            then.status(401).json_body(json!({"message": "jwt expired"}));
        })
        .await;

    let config = config_for(&server, &output_path)?;
    let client = ApiClient::new(&config.api.base_url, "stale-token")?;
    let pipeline = ShiftMatchPipeline::new(client, LocalStorage::new(output_path), config);

    let err = MatchEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, MarketplaceError::AuthError { status: 401, .. }));
    assert!(!temp_dir.path().join("matches.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_offline_run_from_json_files() -> anyhow::Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    std::fs::write(
        input_dir.path().join("profile.json"),
        serde_json::to_vec(&worker_profile())?,
    )?;
    std::fs::write(
        input_dir.path().join("shifts.json"),
        serde_json::to_vec(&json!({"shifts": open_shifts()}))?,
    )?;

    let server = MockServer::start_async().await;
    let mut config = config_for(&server, &output_dir.path().to_string_lossy())?;
    config.matching.min_score = 0;

    let source = JsonFileSource::new(
        LocalStorage::new(input_dir.path()),
        "profile.json",
        "shifts.json",
    );
    let pipeline = ShiftMatchPipeline::with_matching(
        source,
        LocalStorage::new(output_dir.path()),
        config,
        MatchingConfig::default(),
    );

    let report = MatchEngine::new(pipeline).preview().await?;

    let ids: Vec<&str> = report.matches.iter().map(|m| m.shift.id.as_str()).collect();
    assert_eq!(ids, vec!["s-near", "s-rn"]);
    assert!(report.matches[0].score > report.matches[1].score);
    // preview 不寫檔
    assert!(!output_dir.path().join("matches.json").exists());
    Ok(())
}
