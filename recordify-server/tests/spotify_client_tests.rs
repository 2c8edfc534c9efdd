//! Spotify client tests against a local mock of the Web API

use recordify_common::normalize;
use recordify_server::playback::{PlaybackError, PlaybackProvider, SpotifyClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> SpotifyClient {
    SpotifyClient::with_base_url("test-token", server.uri()).unwrap()
}

fn devices_body() -> serde_json::Value {
    json!({
        "devices": [
            { "id": "idle-1", "is_active": false, "name": "Laptop", "type": "Computer" },
            { "id": "active-2", "is_active": true, "name": "Speaker", "type": "Speaker" }
        ]
    })
}

#[tokio::test]
async fn test_start_track_on_active_device() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/devices"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(devices_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/me/player/play"))
        .and(query_param("device_id", "active-2"))
        .and(body_json(json!({ "uris": ["spotify:track:t1"] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.start(&normalize("spotify:track:t1").unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_start_playlist_as_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{ "id": "only", "is_active": false, "name": "Phone", "type": "Smartphone" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/me/player/play"))
        .and(query_param("device_id", "only"))
        .and(body_json(json!({ "context_uri": "spotify:playlist:p1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.start(&normalize("spotify:playlist:p1").unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_start_without_devices() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.start(&normalize("spotify:track:t1").unwrap()).await.unwrap_err();
    assert!(matches!(err, PlaybackError::NoDevice));
}

#[tokio::test]
async fn test_api_error_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_string("The access token expired"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.start(&normalize("spotify:track:t1").unwrap()).await.unwrap_err();
    match err {
        PlaybackError::ApiError(status, body) => {
            assert_eq!(status, 401);
            assert!(body.contains("expired"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_currently_playing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_playing": true,
            "progress_ms": 42000,
            "item": {
                "name": "Song",
                "artists": [{ "name": "A" }, { "name": "B" }],
                "album": { "name": "Album", "images": [{ "url": "https://i.scdn.co/image/1" }] },
                "external_urls": { "spotify": "https://open.spotify.com/track/t1" },
                "uri": "spotify:track:t1"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.current_status().await.unwrap();

    assert!(status.is_playing);
    assert_eq!(status.progress_ms, Some(42000));
    let item = status.item.unwrap();
    assert_eq!(item.name, "Song");
    assert_eq!(item.artists, "A, B");
    assert_eq!(item.album.as_deref(), Some("Album"));
    assert_eq!(item.image_url.as_deref(), Some("https://i.scdn.co/image/1"));
    assert_eq!(item.uri.as_deref(), Some("spotify:track:t1"));
}

#[tokio::test]
async fn test_currently_playing_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.current_status().await.unwrap();

    assert!(!status.is_playing);
    assert!(status.item.is_none());
}

#[tokio::test]
async fn test_currently_playing_without_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_playing": true, "item": null })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.current_status().await.unwrap();

    assert!(!status.is_playing);
    assert!(status.item.is_none());
}
