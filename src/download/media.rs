//! Media file downloading.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::PatreonApi;
use crate::error::{Error, Result};
use crate::media::Media;

/// Suffix of files still being written.
const PARTIAL_SUFFIX: &str = "part";

/// Download a media item into `target_dir` as `{id}.{extension}`.
///
/// The body is streamed into a `.part` file that is renamed into place once
/// complete, so a failed download never leaves a truncated file under the
/// final name.
pub async fn download_media_item(
    api: &PatreonApi,
    media: &Media,
    target_dir: &Path,
) -> Result<PathBuf> {
    let file_name = media.file_name()?;

    // Concurrent workers may race on the same folder; create_dir_all tolerates that
    tokio::fs::create_dir_all(target_dir).await?;

    let output_path = target_dir.join(&file_name);
    let partial_path = target_dir.join(format!("{}.{}", file_name, PARTIAL_SUFFIX));

    if let Err(e) = download_direct(api, &media.url, &partial_path).await {
        let _ = tokio::fs::remove_file(&partial_path).await;
        return Err(e);
    }

    tokio::fs::rename(&partial_path, &output_path).await?;

    Ok(output_path)
}

/// Stream a URL into a file.
async fn download_direct(api: &PatreonApi, url: &str, output_path: &Path) -> Result<()> {
    let response = api.download_file(url).await?;

    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn media(server: &MockServer, id: &str, mimetype: &str) -> Media {
        Media {
            id: id.into(),
            url: format!("{}/media/{}", server.uri(), id),
            mimetype: mimetype.into(),
            width: 2,
            height: 2,
        }
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/m1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
            .mount(&server)
            .await;

        let api = PatreonApi::with_base_url("session_id=abc", &server.uri()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("post");

        let written = download_media_item(&api, &media(&server, "m1", "image/png"), &target)
            .await
            .unwrap();

        assert_eq!(written, target.join("m1.png"));
        assert_eq!(std::fs::read(&written).unwrap(), b"PNGDATA");
        assert!(!target.join("m1.png.part").exists());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/m2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = PatreonApi::with_base_url("session_id=abc", &server.uri()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = download_media_item(&api, &media(&server, "m2", "image/gif"), dir.path()).await;

        assert!(matches!(result, Err(Error::Download(_))));
        assert!(!dir.path().join("m2.gif").exists());
        assert!(!dir.path().join("m2.gif.part").exists());
    }

    #[tokio::test]
    async fn test_invalid_mimetype_is_item_error() {
        let server = MockServer::start().await;
        let api = PatreonApi::with_base_url("session_id=abc", &server.uri()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result =
            download_media_item(&api, &media(&server, "m3", "garbage"), dir.path()).await;

        assert!(matches!(result, Err(Error::Download(_))));
    }
}
