/*!
 * Integration tests for caption sources against local files and a mock HTTP server
 */

use anyhow::Result;
use lyricsync::app_config::FetchConfig;
use lyricsync::caption_fetch::{CaptionFetcher, CaptionSource, FileCaptionSource, HttpCaptionSource};
use lyricsync::caption_processor::parse_captions;
use lyricsync::errors::FetchError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use crate::common;

#[tokio::test]
async fn test_httpSource_withOkResponse_shouldReturnBody() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lyrics/1.vtt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::TWO_CUE_CAPTIONS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = HttpCaptionSource::new(&FetchConfig::default())?;
    let url = format!("{}/lyrics/1.vtt", mock_server.uri());
    let body = source.fetch(&url).await?;

    assert_eq!(parse_captions(&body).len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_httpSource_withNotFound_shouldReportStatus() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = HttpCaptionSource::new(&FetchConfig::default())?;
    let url = format!("{}/missing.vtt", mock_server.uri());

    match source.fetch(&url).await {
        Err(FetchError::HttpStatus { status_code, url: failed }) => {
            assert_eq!(status_code, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected an HTTP status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_fetcher_shouldDispatchByScheme() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("WEBVTT\n\n"))
        .mount(&mock_server)
        .await;

    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_captions(temp_dir.path(), "song.vtt")?;
    let file_url = Url::from_file_path(&file)
        .map_err(|_| anyhow::anyhow!("not an absolute path"))?;

    let fetcher = CaptionFetcher::new(&FetchConfig::default())?;

    let remote = fetcher.fetch(&format!("{}/song.vtt", mock_server.uri())).await?;
    assert_eq!(remote, "WEBVTT\n\n");

    let local = fetcher.fetch(file_url.as_str()).await?;
    assert_eq!(local, common::TWO_CUE_CAPTIONS);

    let plain = fetcher.fetch(&file.display().to_string()).await?;
    assert_eq!(plain, common::TWO_CUE_CAPTIONS);
    Ok(())
}

#[test]
fn test_fileSource_withMissingFile_shouldReportIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.vtt");

    let result = tokio_test::block_on(FileCaptionSource.fetch(&missing.display().to_string()));

    assert!(matches!(result, Err(FetchError::Io { .. })));
    Ok(())
}

#[test]
fn test_fileSource_withOtherScheme_shouldRejectUrl() {
    let result = tokio_test::block_on(FileCaptionSource.fetch("ftp://example.com/1.vtt"));
    assert!(matches!(result, Err(FetchError::UnsupportedUrl(_))));
}
