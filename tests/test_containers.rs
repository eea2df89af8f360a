use mockito::Matcher;
use scitran::ndar::{Dataset, NDAR_GROUP};
use scitran::types::{GroupId, TargetKind, Token};
use scitran::SciTranClient;
use serde_json::json;

mod helpers;
use helpers::{api_url, logged_in, TOKEN};

#[test]
fn test_existing_group() {
    let mut server = mockito::Server::new();
    let get = server
        .mock("GET", "/api/groups/ndar")
        .with_status(200)
        .with_body(json!({"_id": "ndar"}).to_string())
        .create();
    let post = server.mock("POST", "/api/groups").expect(0).create();

    let created = logged_in(&server)
        .ensure_group(&GroupId::from_static("ndar"))
        .unwrap();
    assert!(!created);
    get.assert();
    post.assert();
}

#[test]
fn test_missing_group() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/groups/ndar")
        .with_status(404)
        .create();
    let post = server
        .mock("POST", "/api/groups")
        .match_body(Matcher::Json(json!({"_id": "ndar"})))
        .with_status(200)
        .with_body(json!({"_id": "ndar"}).to_string())
        .create();

    let created = logged_in(&server)
        .ensure_group(&GroupId::from_static("ndar"))
        .unwrap();
    assert!(created);
    post.assert();
}

#[test]
fn test_create_project_then_session() {
    let mut server = mockito::Server::new();
    let project = server
        .mock("POST", "/api/projects")
        .match_body(Matcher::Json(json!({"label": "ndar_study", "group": "ndar"})))
        .with_status(200)
        .with_body(json!({"_id": "5a0c1f2e"}).to_string())
        .create();
    let session = server
        .mock("POST", "/api/sessions")
        .match_body(Matcher::PartialJson(json!({"project": "5a0c1f2e"})))
        .with_status(200)
        .with_body(json!({"_id": "5a0c1f30"}).to_string())
        .create();

    let client = logged_in(&server);
    let project_id = client
        .create_container(
            TargetKind::Project,
            &json!({"label": "ndar_study", "group": "ndar"}),
        )
        .unwrap();
    assert_eq!(project_id.as_str(), "5a0c1f2e");

    let session_id = client
        .create_container(
            TargetKind::Session,
            &json!({
                "label": "NDARAB123XYZ",
                "project": project_id,
                "subject": {"code": "NDARAB123XYZ", "sex": "female"}
            }),
        )
        .unwrap();
    assert_eq!(session_id.as_str(), "5a0c1f30");
    project.assert();
    session.assert();
}

#[test]
fn test_group_id_is_one_path_segment() {
    let mut server = mockito::Server::new();
    let get = server
        .mock("GET", "/api/groups/a%2F..%2F..%2Fx%3Fy")
        .with_status(200)
        .with_body(json!({"_id": "a/../../x?y"}).to_string())
        .create();
    let elsewhere = server
        .mock("GET", Matcher::Regex("^/api/x".to_string()))
        .expect(0)
        .create();

    let created = logged_in(&server)
        .ensure_group(&GroupId::from_static("a/../../x?y"))
        .unwrap();
    assert!(!created);
    get.assert();
    elsewhere.assert();
}

const SUBJECTS: &str = "\
subjectkey\tgender\tinterview_age
The NDAR Global Unique Identifier\tSex of the subject\tAge in months
NDARAB123XYZ\tF\t120
NDARCD456UVW\tM\t96
";

const IMAGES: &str = "\
subjectkey\timage_file
The NDAR Global Unique Identifier\tLocation of the image
NDARAB123XYZ\ts3://ndar/NDARAB123XYZ/t1w.nii.gz
NDARAB123XYZ\ts3://ndar/NDARAB123XYZ/dwi.nii.gz
";

#[test]
fn test_import_dataset() {
    let mut server = mockito::Server::new();
    let admin = Matcher::AllOf(vec![
        Matcher::UrlEncoded("root".into(), "true".into()),
        Matcher::UrlEncoded("user".into(), "admin@example.org".into()),
    ]);
    let group = server
        .mock("GET", "/api/groups/ndar")
        .match_query(admin.clone())
        .with_status(404)
        .create();
    let new_group = server
        .mock("POST", "/api/groups")
        .match_query(admin.clone())
        .match_body(Matcher::Json(json!({"_id": "ndar"})))
        .with_status(200)
        .with_body(json!({"_id": "ndar"}).to_string())
        .create();
    let project = server
        .mock("POST", "/api/projects")
        .match_query(admin.clone())
        .match_body(Matcher::Json(json!({"label": "study_01", "group": "ndar"})))
        .with_status(200)
        .with_body(json!({"_id": "p1"}).to_string())
        .create();
    let session = server
        .mock("POST", "/api/sessions")
        .match_query(admin.clone())
        .match_body(Matcher::PartialJson(json!({
            "label": "NDARAB123XYZ",
            "project": "p1",
            "subject": {"code": "NDARAB123XYZ", "sex": "f", "age": 315_576_000}
        })))
        .with_status(200)
        .with_body(json!({"_id": "s1"}).to_string())
        .expect(1)
        .create();
    let acquisitions = server
        .mock("POST", "/api/acquisitions")
        .match_query(admin)
        .match_body(Matcher::PartialJson(json!({"session": "s1"})))
        .with_status(200)
        .with_body(json!({"_id": "a1"}).to_string())
        .expect(2)
        .create();

    let client = SciTranClient::builder(api_url(&server))
        .token(Token::from_static(TOKEN))
        .root(true)
        .user("admin@example.org")
        .build()
        .unwrap();
    let dataset = Dataset::from_readers(
        "study_01",
        GroupId::from_static(NDAR_GROUP),
        SUBJECTS.as_bytes(),
        IMAGES.as_bytes(),
    )
    .unwrap();
    let report = client.import(&dataset).unwrap();

    assert_eq!(report.project.as_str(), "p1");
    assert_eq!(report.sessions.len(), 1);
    assert_eq!(report.acquisitions.len(), 2);
    group.assert();
    new_group.assert();
    project.assert();
    session.assert();
    acquisitions.assert();
}

#[test]
fn test_import_stops_at_failure() {
    let mut server = mockito::Server::new();
    let _group = server
        .mock("GET", "/api/groups/ndar")
        .with_status(200)
        .with_body(json!({"_id": "ndar"}).to_string())
        .create();
    let _project = server
        .mock("POST", "/api/projects")
        .with_status(500)
        .create();
    let session = server.mock("POST", "/api/sessions").expect(0).create();

    let dataset = Dataset::from_readers(
        "study_01",
        GroupId::from_static(NDAR_GROUP),
        SUBJECTS.as_bytes(),
        IMAGES.as_bytes(),
    )
    .unwrap();
    let actual = logged_in(&server).import(&dataset);
    assert!(matches!(
        actual,
        Err(scitran::errors::ImportError::Service(
            scitran::errors::ServiceError::ServiceUnavailable(_)
        ))
    ));
    session.assert();
}
