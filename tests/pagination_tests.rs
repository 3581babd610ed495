//! End-to-end pagination tests against a mock GitHub API.

use futures::StreamExt;
use github_rest::{
    GitHubClient, GitHubErrorKind, ListOptions, PageRequest,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests that do NOT carry the given query parameter, so the
/// first-page mock never swallows continuation requests.
struct MissingParam(&'static str);

impl Match for MissingParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(k, _)| k == self.0)
    }
}

async fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::builder()
        .base_url(server.uri())
        .token("test-token")
        .user_agent("github-rest-tests/0.1")
        .build()
        .expect("client should build")
}

fn user_json(id: u64, login: &str) -> Value {
    json!({
        "id": id,
        "login": login,
        "node_id": format!("U_{}", id),
        "avatar_url": "https://example.com/avatar.png",
        "type": "User",
        "site_admin": false,
        "html_url": format!("https://github.com/{}", login)
    })
}

fn alert_json(number: u64) -> Value {
    json!({
        "number": number,
        "state": "open",
        "secret_type": "github_personal_access_token",
        "secret_type_display_name": "GitHub Personal Access Token",
        "secret": null,
        "resolution": null,
        "resolved_at": null,
        "resolved_by": null,
        "html_url": format!("https://github.com/o/r/security/secret-scanning/{}", number),
        "locations_url": null,
        "created_at": "2020-11-06T18:18:30Z",
        "updated_at": null
    })
}

fn runner_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "os": "linux",
        "status": "online",
        "busy": false,
        "labels": [{"name": "self-hosted", "type": "read-only"}]
    })
}

#[tokio::test]
async fn scan_follows_page_number_links() {
    let server = MockServer::start().await;
    let followers = "/users/octocat/followers";

    Mock::given(method("GET"))
        .and(path(followers))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=3&per_page=2>; rel="next""#, server.uri(), followers)
                        .as_str(),
                )
                .set_body_json(json!([user_json(3, "u3"), user_json(4, "u4")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(followers))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([user_json(5, "u5")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(followers))
        .and(MissingParam("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=2&per_page=2>; rel="next""#, server.uri(), followers)
                        .as_str(),
                )
                .set_body_json(json!([user_json(1, "u1"), user_json(2, "u2")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let users = client
        .users()
        .scan_followers("octocat", ListOptions::new().per_page(2))
        .collect_all()
        .await
        .unwrap();

    let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["u1", "u2", "u3", "u4", "u5"]);
}

#[tokio::test]
async fn scan_follows_cursor_links() {
    let server = MockServer::start().await;
    let alerts = "/repos/o/r/secret-scanning/alerts";

    Mock::given(method("GET"))
        .and(path(alerts))
        .and(query_param("after", "c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([alert_json(3)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(alerts))
        .and(MissingParam("after"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?after=c1>; rel="next""#, server.uri(), alerts).as_str(),
                )
                .set_body_json(json!([alert_json(1), alert_json(2)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let numbers: Vec<u64> = client
        .secret_scanning()
        .scan_alerts_for_repo("o", "r", Default::default())
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.number)
        .collect();

    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn scan_surfaces_mid_pagination_errors() {
    let server = MockServer::start().await;
    let followers = "/users/octocat/followers";

    Mock::given(method("GET"))
        .and(path(followers))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({
                "message": "Server Error",
                "documentation_url": null
            })),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(followers))
        .and(MissingParam("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=2>; rel="next""#, server.uri(), followers).as_str(),
                )
                .set_body_json(json!([user_json(1, "u1")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    // collect_all never hands back a partial result
    let result = client
        .users()
        .scan_followers("octocat", ListOptions::new())
        .collect_all()
        .await;
    let error = result.unwrap_err();
    assert_eq!(*error.kind(), GitHubErrorKind::InternalError);

    // the deferred check reports the same failure after draining
    let (items, check) = client
        .users()
        .scan_followers("octocat", ListOptions::new())
        .into_items();
    let drained: Vec<_> = items.collect().await;
    assert_eq!(drained.len(), 1);
    assert!(check.check().is_err());
}

#[tokio::test]
async fn scan_unwraps_enveloped_list_bodies() {
    let server = MockServer::start().await;
    let runners = "/enterprises/acme/actions/runners";

    Mock::given(method("GET"))
        .and(path(runners))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "runners": [runner_json(3, "runner-3")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(runners))
        .and(MissingParam("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=2>; rel="next""#, server.uri(), runners).as_str(),
                )
                .set_body_json(json!({
                    "total_count": 3,
                    "runners": [runner_json(1, "runner-1"), runner_json(2, "runner-2")]
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let page = client
        .enterprise()
        .list_runners("acme", &PageRequest::First, &ListOptions::new())
        .await
        .unwrap();
    assert_eq!(page.total_count, Some(3));
    assert_eq!(page.next_request(), Some(PageRequest::Offset(2)));

    let names: Vec<String> = client
        .enterprise()
        .scan_runners("acme", ListOptions::new())
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["runner-1", "runner-2", "runner-3"]);
}

#[tokio::test]
async fn early_stop_fetches_no_further_pages() {
    let server = MockServer::start().await;
    let followers = "/users/octocat/followers";

    Mock::given(method("GET"))
        .and(path(followers))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([user_json(3, "u3")])),
        )
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(followers))
        .and(MissingParam("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=2>; rel="next""#, server.uri(), followers).as_str(),
                )
                .set_body_json(json!([user_json(1, "u1"), user_json(2, "u2")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut stream = client
        .users()
        .scan_followers("octocat", ListOptions::new())
        .into_stream();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.login, "u1");
    drop(stream);

    // enforces the expect(0) on the page-2 mock
    server.verify().await;
}

#[tokio::test]
async fn single_page_listing_reports_continuation() {
    let server = MockServer::start().await;
    let followers = "/users/octocat/followers";

    Mock::given(method("GET"))
        .and(path(followers))
        .and(MissingParam("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}{}?page=2>; rel="next""#, server.uri(), followers).as_str(),
                )
                .set_body_json(json!([user_json(1, "u1")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client
        .users()
        .list_followers("octocat", &PageRequest::First, &ListOptions::new())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert!(page.has_next());
    assert_eq!(page.next_request(), Some(PageRequest::Offset(2)));
}
