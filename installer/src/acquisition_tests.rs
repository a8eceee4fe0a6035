//! Unit tests for client acquisition orchestration.

use super::*;
use crate::artefact::download::{FetchError, MockArtefactDownloader};
use crate::artefact::extraction::{ExtractionError, MockArchiveExtractor};
use rstest::{fixture, rstest};
use sha2::{Digest, Sha256};

const FAKE_ARCHIVE: &[u8] = b"fake client archive";

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn manifest_body(digest: &str) -> String {
    format!("{digest}  {}\n", Artifact::fallback().archive_filename())
}

struct WorkDir {
    _temp: tempfile::TempDir,
    path: Utf8PathBuf,
}

impl WorkDir {
    fn config(&self) -> AcquisitionConfig<'_> {
        AcquisitionConfig {
            work_dir: &self.path,
            strategy: ResolutionStrategy::DiscoveredLatest,
            quiet: true,
        }
    }

    fn archive_path(&self) -> Utf8PathBuf {
        self.path.join(Artifact::fallback().archive_filename())
    }
}

#[fixture]
fn work_dir() -> WorkDir {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    WorkDir { _temp: temp, path }
}

fn downloader_serving(manifest: String, archive: &'static [u8]) -> MockArtefactDownloader {
    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_fetch_text()
        .withf(|url| url == Artifact::fallback().checksum_url())
        .times(1)
        .returning(move |_| Ok(manifest.clone()));
    downloader
        .expect_fetch_to_file()
        .withf(|url, _dest| url == Artifact::fallback().client_url())
        .times(1)
        .returning(move |_url, dest| std::fs::write(dest, archive).map_err(FetchError::Io));
    downloader
}

fn extractor_writing_marker() -> MockArchiveExtractor {
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().times(1).returning(|_archive, dest| {
        std::fs::write(dest.join(INSTALLER_MARKER), b"deb").map_err(ExtractionError::Io)?;
        Ok(vec![INSTALLER_MARKER.to_owned()])
    });
    extractor
}

#[rstest]
fn happy_path_extracts_into_tsm_client(work_dir: WorkDir) {
    let downloader = downloader_serving(manifest_body(&sha256_hex(FAKE_ARCHIVE)), FAKE_ARCHIVE);
    let extractor = extractor_writing_marker();

    let mut stderr = Vec::new();
    let dir = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect("acquisition succeeds");

    assert_eq!(dir, work_dir.path.join(EXTRACTION_DIR_NAME));
    assert!(dir.join(INSTALLER_MARKER).exists());
    assert!(work_dir.archive_path().exists());
}

#[rstest]
fn existing_marker_skips_all_network_work(work_dir: WorkDir) {
    let extraction_dir = work_dir.path.join(EXTRACTION_DIR_NAME);
    std::fs::create_dir_all(&extraction_dir).expect("create extraction dir");
    std::fs::write(extraction_dir.join(INSTALLER_MARKER), b"deb").expect("write marker");

    let mut downloader = MockArtefactDownloader::new();
    downloader.expect_fetch_text().never();
    downloader.expect_fetch_to_file().never();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let mut stderr = Vec::new();
    let dir = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect("acquisition is a no-op");
    assert_eq!(dir, extraction_dir);
}

#[rstest]
fn progress_line_is_printed_unless_quiet(work_dir: WorkDir) {
    let extraction_dir = work_dir.path.join(EXTRACTION_DIR_NAME);
    std::fs::create_dir_all(&extraction_dir).expect("create extraction dir");
    std::fs::write(extraction_dir.join(INSTALLER_MARKER), b"deb").expect("write marker");
    let config = AcquisitionConfig {
        quiet: false,
        ..work_dir.config()
    };

    let mut stderr = Vec::new();
    acquire_client_with(
        &config,
        &MockArtefactDownloader::new(),
        &MockArchiveExtractor::new(),
        &mut stderr,
    )
    .expect("acquisition is a no-op");
    let text = String::from_utf8(stderr).expect("UTF-8 stderr");
    assert!(text.starts_with("Downloading TSM client"));
}

#[rstest]
#[case::single_field("deadbeef".to_owned())]
#[case::three_fields(format!("{} client.tar extra", "a".repeat(64)))]
#[case::empty(String::new())]
fn malformed_manifest_stops_before_download(work_dir: WorkDir, #[case] body: String) {
    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_fetch_text()
        .returning(move |_| Ok(body.clone()));
    downloader.expect_fetch_to_file().never();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let mut stderr = Vec::new();
    let err = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect_err("malformed manifest");
    assert!(matches!(err, DownloadError::MalformedChecksumManifest { .. }));
    assert!(err.to_string().contains("could not download the client checksum"));
}

#[rstest]
fn unreachable_manifest_is_a_download_error(work_dir: WorkDir) {
    let mut downloader = MockArtefactDownloader::new();
    downloader.expect_fetch_text().returning(|url| {
        Err(FetchError::NotFound {
            url: url.to_owned(),
        })
    });
    downloader.expect_fetch_to_file().never();

    let mut stderr = Vec::new();
    let err = acquire_client_with(
        &work_dir.config(),
        &downloader,
        &MockArchiveExtractor::new(),
        &mut stderr,
    )
    .expect_err("manifest unavailable");
    assert!(matches!(err, DownloadError::ChecksumUnavailable { .. }));
}

#[rstest]
fn manifest_for_another_archive_is_rejected(work_dir: WorkDir) {
    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_fetch_text()
        .returning(|_| Ok(format!("{}  8.1.24.0-TIV-TSMBAC-LinuxX86_DEB.tar", "a".repeat(64))));
    downloader.expect_fetch_to_file().never();

    let mut stderr = Vec::new();
    let err = acquire_client_with(
        &work_dir.config(),
        &downloader,
        &MockArchiveExtractor::new(),
        &mut stderr,
    )
    .expect_err("name mismatch");
    assert!(matches!(
        err,
        DownloadError::ArchiveNameMismatch { ref manifest, .. } if manifest.starts_with("8.1.24.0")
    ));
}

#[rstest]
fn checksum_mismatch_never_extracts(work_dir: WorkDir) {
    let downloader = downloader_serving(manifest_body(&"a".repeat(64)), b"tampered content");
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let mut stderr = Vec::new();
    let err = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect_err("checksum mismatch");
    assert!(matches!(err, DownloadError::ChecksumMismatch { .. }));
    assert!(!work_dir.path.join(EXTRACTION_DIR_NAME).exists());
}

#[rstest]
fn existing_archive_is_verified_without_download(work_dir: WorkDir) {
    std::fs::write(work_dir.archive_path(), FAKE_ARCHIVE).expect("seed archive");
    let digest = sha256_hex(FAKE_ARCHIVE);

    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_fetch_text()
        .times(1)
        .returning(move |_| Ok(manifest_body(&digest)));
    downloader.expect_fetch_to_file().never();
    let extractor = extractor_writing_marker();

    let mut stderr = Vec::new();
    acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect("acquisition succeeds");
}

#[rstest]
fn failed_archive_download_removes_partial_file(work_dir: WorkDir) {
    let digest = sha256_hex(FAKE_ARCHIVE);
    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_fetch_text()
        .returning(move |_| Ok(manifest_body(&digest)));
    downloader.expect_fetch_to_file().returning(|url, dest| {
        std::fs::write(dest, b"partial").map_err(FetchError::Io)?;
        Err(FetchError::Http {
            url: url.to_owned(),
            reason: "connection reset".to_owned(),
        })
    });
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let mut stderr = Vec::new();
    let err = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect_err("download failure");
    assert!(matches!(err, DownloadError::ClientUnavailable { .. }));
    assert!(!work_dir.archive_path().exists());
}

#[rstest]
fn failed_extraction_removes_extraction_dir(work_dir: WorkDir) {
    let downloader = downloader_serving(manifest_body(&sha256_hex(FAKE_ARCHIVE)), FAKE_ARCHIVE);
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .returning(|_archive, _dest| Err(ExtractionError::EmptyArchive));

    let mut stderr = Vec::new();
    let err = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect_err("extraction failure");
    assert!(matches!(err, DownloadError::Extraction { .. }));
    assert!(err.to_string().starts_with("could not extract the client"));
    assert!(!work_dir.path.join(EXTRACTION_DIR_NAME).exists());
}

#[rstest]
fn failed_extraction_keeps_pre_existing_dir(work_dir: WorkDir) {
    let extraction_dir = work_dir.path.join(EXTRACTION_DIR_NAME);
    std::fs::create_dir_all(&extraction_dir).expect("create extraction dir");
    std::fs::write(extraction_dir.join("notes.txt"), b"keep me").expect("write unrelated file");
    let downloader = downloader_serving(manifest_body(&sha256_hex(FAKE_ARCHIVE)), FAKE_ARCHIVE);
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .returning(|_archive, _dest| Err(ExtractionError::EmptyArchive));

    let mut stderr = Vec::new();
    let err = acquire_client_with(&work_dir.config(), &downloader, &extractor, &mut stderr)
        .expect_err("extraction failure");
    assert!(matches!(err, DownloadError::Extraction { .. }));
    assert_eq!(
        std::fs::read(extraction_dir.join("notes.txt")).expect("unrelated file survives"),
        b"keep me"
    );
}
