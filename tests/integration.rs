use std::sync::Arc;

use svg_sanitizer::{
    FsFile, FsStorage, STYLE_REMOVED, SVG_MIME_TYPE, Storage, SvgError, SvgUploaderBuilder,
    UploadedFile, create_svg_buffer, is_svg_file, sanitize_svg, sanitize_svg_file,
};
use tempfile::TempDir;
use tokio::sync::Mutex as TokioMutex;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// In-memory storage for testing without touching the filesystem.
#[derive(Clone)]
#[allow(clippy::type_complexity)]
struct MemoryStorage {
    files: Arc<TokioMutex<Vec<(String, Vec<u8>, String)>>>,
    deleted: Arc<TokioMutex<Vec<String>>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            files: Arc::new(TokioMutex::new(Vec::new())),
            deleted: Arc::new(TokioMutex::new(Vec::new())),
        }
    }
}

impl Storage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> svg_sanitizer::Result<()> {
        self.files.lock().await.push((
            key.to_string(),
            content.to_vec(),
            content_type.to_string(),
        ));
        Ok(())
    }

    async fn delete(&self, key: &str) -> svg_sanitizer::Result<()> {
        self.deleted.lock().await.push(key.to_string());
        Ok(())
    }
}

/// Storage that always fails -- for testing error paths.
#[derive(Clone)]
struct FailingStorage;

impl Storage for FailingStorage {
    async fn put(
        &self,
        _key: &str,
        _content: &[u8],
        _content_type: &str,
    ) -> svg_sanitizer::Result<()> {
        Err(SvgError::StorageUpload("simulated failure".into()))
    }

    async fn delete(&self, _key: &str) -> svg_sanitizer::Result<()> {
        Err(SvgError::StorageUpload("simulated failure".into()))
    }
}

fn svg_upload(name: &str, body: &str) -> UploadedFile {
    UploadedFile::new(name, SVG_MIME_TYPE, body)
}

/// Hostile inputs that each still contain a well-formed `<svg>...</svg>` pair.
const HOSTILE: &[&str] = &[
    r#"<svg><script>alert(1)</script></svg>"#,
    r#"<svg onload="alert(1)"></svg>"#,
    r#"<svg ONLOAD='alert(1)' OnClick="x()"></svg>"#,
    r#"<svg><a href="javascript:alert(1)"><text>x</text></a></svg>"#,
    r##"<svg><a xlink:href="javascript:alert(1)"/><use href="#a"/></svg>"##,
    r#"<svg><iframe src="https://evil.example"></iframe></svg>"#,
    r#"<svg><IFRAME/></svg>"#,
    r#"<svg><scr<script>x</script>ipt>alert(1)</script></svg>"#,
    r#"<svg><script>alert(1)</svg>"#,
    r#"<svg><foreignObject><iframe src="x"/><body onclick="x()"/></foreignObject></svg>"#,
    r#"<svg><set attributeName="href" to="javascript:alert(1)"/></svg>"#,
    r#"<svg><animate attributeName="href" values="0;javascript:alert(1)"/></svg>"#,
    r#"<svg><style>@import url(https://evil.example/x.css);</style></svg>"#,
    r#"<svg><style>.a{fill:url(javascript:alert(1))}</style></svg>"#,
    r#"<svg><rect style="background:url(javascript:alert(1))"/></svg>"#,
    r#"<svg><!-- <script>alert(1)</script> --><!-- javascript: --></svg>"#,
    r#"<svg><![CDATA[<script>alert(1)</script>]]></svg>"#,
    r#"<svg><rect on<!-- script -->load="alert(1)"/></svg>"#,
    r#"<svg><object data="x.swf"></object><embed src="y"/><meta http-equiv="refresh"/></svg>"#,
    r#"<svg><image href="data:image/svg+xml;base64,PHN2Zz4=" onerror="x()"/></svg>"#,
    r#"<svg onpointerrawupdate="alert(1)"><rect onauxclick="alert(2)" onscrollend="alert(3)"/></svg>"#,
    r#"<svg><rect style="fill:\75 rl(https://evil.example/x)"/><style>.a{fill:\75 rl(https://evil.example/y)}</style></svg>"#,
    r#"<svg><style>*{background:url(https://evil.example/z)}</style x><rect style=behavior:url(x)/></svg>"#,
    // Removed silently, so it must stay last (see `hostile_inputs_are_reported`).
    "<!DOCTYPE svg [<!ENTITY x SYSTEM \"file:///etc/passwd\">]><svg>&x;</svg>",
];

// ---------------------------------------------------------------------------
// End-to-end sanitization scenarios
// ---------------------------------------------------------------------------

#[test]
fn script_element_removed() {
    let result = sanitize_svg(r#"<svg><script>alert(1)</script><circle fill="red"/></svg>"#).unwrap();
    assert_eq!(result.sanitized_svg, r#"<svg><circle fill="red"/></svg>"#);
    assert!(result.has_removed_dangerous_content);
    assert!(result.removed_elements.contains(&"script".to_string()));
}

#[test]
fn event_handler_removed() {
    let result = sanitize_svg(r#"<svg onload="evil()"><rect/></svg>"#).unwrap();
    assert_eq!(result.sanitized_svg, "<svg><rect/></svg>");
    assert!(result.removed_attributes.contains(&"onload".to_string()));
}

#[test]
fn javascript_href_removed_entirely() {
    let result = sanitize_svg(r#"<svg><a href="javascript:alert(1)"><rect/></a></svg>"#).unwrap();
    assert_eq!(result.sanitized_svg, "<svg><a><rect/></a></svg>");
    assert!(!result.sanitized_svg.contains("javascript:"));
    assert_eq!(result.removed_attributes, vec!["href"]);
}

#[test]
fn style_attributes_reduced_to_safe_properties() {
    let result =
        sanitize_svg(r#"<svg style="fill:blue"><rect style="fill:red;position:absolute"/></svg>"#)
            .unwrap();
    assert_eq!(
        result.sanitized_svg,
        r#"<svg style="fill: blue"><rect style="fill: red"/></svg>"#
    );
}

#[test]
fn doctype_preamble_removed() {
    let body = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="1" height="1"/></svg>"#;
    let input = format!(
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">{body}"#
    );
    let result = sanitize_svg(&input).unwrap();
    assert_eq!(result.sanitized_svg, body);
    assert!(!result.has_removed_dangerous_content);
}

#[test]
fn empty_input_rejected() {
    let err = sanitize_svg("").unwrap_err();
    assert!(matches!(err, SvgError::Sanitize(_)));
}

#[test]
fn style_block_with_dangerous_pattern_dropped() {
    let result = sanitize_svg("<svg><style>.a{fill:red;behavior:url(#x);}</style><rect/></svg>").unwrap();
    assert_eq!(result.sanitized_svg, "<svg><rect/></svg>");
    assert!(result.removed_elements.contains(&STYLE_REMOVED.to_string()));
}

#[test]
fn illustrator_export_keeps_visuals() {
    let input = concat!(
        r#"<?xml version="1.0" encoding="utf-8"?>"#,
        "\n<!-- Generator: Adobe Illustrator 27.0.0 -->\n",
        r#"<svg version="1.1" id="Layer_1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" x="0px" y="0px" viewBox="0 0 100 100" style="enable-background:new 0 0 100 100;" xml:space="preserve">"#,
        "<style type=\"text/css\">\n\t.st0{fill:#E6007E;}\n</style>",
        r#"<linearGradient id="g" gradientUnits="userSpaceOnUse"><stop offset="0" style="stop-color:#FFF"/></linearGradient>"#,
        r#"<circle class="st0" cx="50" cy="50" r="40"/>"#,
        "</svg>",
    );
    let result = sanitize_svg(input).unwrap();
    let out = &result.sanitized_svg;
    assert!(out.starts_with("<!-- Generator: Adobe Illustrator 27.0.0 -->"));
    assert!(out.contains(r#"<style type="text/css">.st0 { fill: #E6007E; }</style>"#));
    assert!(out.contains(r#"style="stop-color: #FFF""#));
    assert!(out.contains(r#"<circle class="st0" cx="50" cy="50" r="40"/>"#));
    assert!(out.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    // enable-background is not an allow-listed CSS property
    assert!(!out.contains("enable-background"));
    assert!(result.removed_attributes.contains(&STYLE_REMOVED.to_string()));
}

// ---------------------------------------------------------------------------
// Invariants over hostile inputs
// ---------------------------------------------------------------------------

#[test]
fn hostile_inputs_never_keep_script_vectors() {
    for input in HOSTILE {
        let result = sanitize_svg(input).unwrap_or_else(|e| panic!("{input}: {e}"));
        let out = result.sanitized_svg.to_lowercase();
        for needle in [
            "<script",
            "onload=",
            "onclick=",
            "onauxclick=",
            "javascript:",
            "<iframe",
            "evil.example",
        ] {
            assert!(!out.contains(needle), "{input} kept {needle}: {out}");
        }
    }
}

#[test]
fn hostile_inputs_never_keep_links() {
    for input in HOSTILE {
        let out = sanitize_svg(input).unwrap().sanitized_svg.to_lowercase();
        assert!(!out.contains("href="), "{input} kept a link: {out}");
    }
}

#[test]
fn hostile_inputs_are_reported() {
    for input in &HOSTILE[..HOSTILE.len() - 1] {
        let result = sanitize_svg(input).unwrap();
        assert!(result.has_removed_dangerous_content, "{input} not reported");
    }
}

#[test]
fn sanitizing_twice_removes_nothing_more() {
    for input in HOSTILE {
        let first = sanitize_svg(input).unwrap();
        let second = sanitize_svg(&first.sanitized_svg).unwrap();
        assert_eq!(second.sanitized_svg, first.sanitized_svg, "{input}");
        assert!(!second.has_removed_dangerous_content, "{input}");
    }
}

#[test]
fn inputs_without_svg_rejected() {
    for input in [
        "",
        "plain text",
        "<html><body><h1>hi</h1></body></html>",
        r#"<?xml version="1.0"?><root/>"#,
        "<svg><script>x</script>",
        "<script><svg></svg></script>",
    ] {
        assert!(sanitize_svg(input).is_err(), "{input:?} should be rejected");
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

#[test]
fn is_svg_file_checks_type_and_name() {
    assert!(is_svg_file(&svg_upload("a.Svg", "")));
    assert!(!is_svg_file(&svg_upload("a.svg.png", "")));
    assert!(!is_svg_file(&UploadedFile::new("a.svg", "image/webp", "")));
}

#[test]
fn buffer_round_trips_sanitized_markup() {
    let result = sanitize_svg("<svg><text>héllo</text></svg>").unwrap();
    let buffer = create_svg_buffer(&result.sanitized_svg);
    assert_eq!(String::from_utf8(buffer).unwrap(), result.sanitized_svg);
}

#[tokio::test]
async fn fs_file_sanitized_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("logo.svg");
    tokio::fs::write(&path, r#"<svg><script>x</script><rect/></svg>"#)
        .await
        .unwrap();

    let result = sanitize_svg_file(&FsFile::new(&path, SVG_MIME_TYPE))
        .await
        .unwrap();
    assert_eq!(result.sanitized_svg, "<svg><rect/></svg>");
}

#[tokio::test]
async fn missing_fs_file_is_read_error() {
    let tmp = TempDir::new().unwrap();
    let file = FsFile::new(tmp.path().join("missing.svg"), SVG_MIME_TYPE);
    let err = sanitize_svg_file(&file).await.unwrap_err();
    assert!(matches!(err, SvgError::Read(_)));
}

#[tokio::test]
async fn wrong_type_rejected_before_reading() {
    // The path does not exist: a read attempt would yield SvgError::Read.
    let file = FsFile::new("/nonexistent/logo.svg", "image/png");
    let err = sanitize_svg_file(&file).await.unwrap_err();
    assert!(matches!(err, SvgError::NotSvg(_)));
}

// ---------------------------------------------------------------------------
// FsStorage tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fs_storage_write_and_delete() {
    let tmp = TempDir::new().unwrap();
    let storage = FsStorage::new(tmp.path());

    storage
        .put("banners/a.svg", b"<svg></svg>", SVG_MIME_TYPE)
        .await
        .unwrap();
    let path = tmp.path().join("banners/a.svg");
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "<svg></svg>");

    storage.delete("banners/a.svg").await.unwrap();
    assert!(!path.exists());

    // Deleting again is not an error.
    storage.delete("banners/a.svg").await.unwrap();
}

// ---------------------------------------------------------------------------
// Uploader tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_stores_sanitized_svg_under_prefix() {
    let storage = MemoryStorage::new();
    let files = storage.files.clone();
    let uploader = SvgUploaderBuilder::new(storage)
        .prefix("/carousel/")
        .build()
        .unwrap();

    let stored = uploader
        .upload(&svg_upload(
            "slide.svg",
            r#"<svg onclick="x()"><circle r="1"/></svg>"#,
        ))
        .await
        .unwrap();

    assert_eq!(stored.key, "carousel/slide.svg");
    assert_eq!(stored.size, r#"<svg><circle r="1"/></svg>"#.len());
    assert_eq!(stored.report.removed_attributes, vec!["onclick"]);

    let stored_files = files.lock().await;
    assert_eq!(stored_files.len(), 1);
    let (key, content, content_type) = &stored_files[0];
    assert_eq!(key, "carousel/slide.svg");
    assert_eq!(content, br#"<svg><circle r="1"/></svg>"#);
    assert_eq!(content_type, SVG_MIME_TYPE);
}

#[tokio::test]
async fn upload_to_filesystem() {
    let tmp = TempDir::new().unwrap();
    let uploader = SvgUploaderBuilder::new(FsStorage::new(tmp.path()))
        .prefix("media")
        .build()
        .unwrap();

    uploader
        .upload(&svg_upload("../../escape.svg", "<svg><rect/></svg>"))
        .await
        .unwrap();

    let path = tmp.path().join("media/escape.svg");
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "<svg><rect/></svg>");
}

#[tokio::test]
async fn upload_rejects_non_svg_without_storing() {
    let storage = MemoryStorage::new();
    let files = storage.files.clone();
    let uploader = SvgUploaderBuilder::new(storage).build().unwrap();

    let png_named = UploadedFile::new("photo.png", SVG_MIME_TYPE, "<svg></svg>");
    let err = uploader.upload(&png_named).await.unwrap_err();
    assert!(matches!(err, SvgError::NotSvg(_)));

    let invalid = svg_upload("broken.svg", "<html></html>");
    let err = uploader.upload(&invalid).await.unwrap_err();
    assert!(matches!(err, SvgError::Sanitize(_)));

    assert!(files.lock().await.is_empty());
}

#[tokio::test]
async fn upload_enforces_size_limit() {
    let uploader = SvgUploaderBuilder::new(MemoryStorage::new())
        .max_bytes(16)
        .build()
        .unwrap();

    let err = uploader
        .upload(&svg_upload("big.svg", r#"<svg><rect width="100"/></svg>"#))
        .await
        .unwrap_err();
    assert!(matches!(err, SvgError::TooLarge { limit: 16, .. }));
}

#[tokio::test]
async fn upload_surfaces_storage_failure() {
    let uploader = SvgUploaderBuilder::new(FailingStorage).build().unwrap();
    let err = uploader
        .upload(&svg_upload("a.svg", "<svg></svg>"))
        .await
        .unwrap_err();
    assert!(matches!(err, SvgError::StorageUpload(_)));
}

#[tokio::test]
async fn upload_all_keeps_input_order() {
    let storage = MemoryStorage::new();
    let files = storage.files.clone();
    let uploader = SvgUploaderBuilder::new(storage).build().unwrap();

    let uploads = vec![
        svg_upload("a.svg", "<svg><rect/></svg>"),
        svg_upload("b.svg", "not an svg"),
        svg_upload("c.svg", "<svg><script>x</script></svg>"),
    ];
    let results = uploader.upload_all(&uploads).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().key, "a.svg");
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().report.removed_elements, vec!["script"]);
    assert_eq!(files.lock().await.len(), 2);
}

#[tokio::test]
async fn replace_deletes_previous_object() {
    let storage = MemoryStorage::new();
    let deleted = storage.deleted.clone();
    let uploader = SvgUploaderBuilder::new(storage)
        .prefix("banners")
        .build()
        .unwrap();

    let stored = uploader
        .replace("banners/old.svg", &svg_upload("new.svg", "<svg></svg>"))
        .await
        .unwrap();
    assert_eq!(stored.key, "banners/new.svg");
    assert_eq!(*deleted.lock().await, vec!["banners/old.svg".to_string()]);
}

#[tokio::test]
async fn replace_keeps_previous_object_when_upload_fails() {
    let storage = MemoryStorage::new();
    let deleted = storage.deleted.clone();
    let uploader = SvgUploaderBuilder::new(storage).build().unwrap();

    let result = uploader
        .replace("old.svg", &svg_upload("new.svg", "garbage"))
        .await;
    assert!(result.is_err());
    assert!(deleted.lock().await.is_empty());
}

#[tokio::test]
async fn replace_with_same_key_does_not_delete() {
    let storage = MemoryStorage::new();
    let deleted = storage.deleted.clone();
    let uploader = SvgUploaderBuilder::new(storage).build().unwrap();

    uploader
        .replace("logo.svg", &svg_upload("logo.svg", "<svg></svg>"))
        .await
        .unwrap();
    assert!(deleted.lock().await.is_empty());
}

#[test]
fn zero_size_limit_is_config_error() {
    let result = SvgUploaderBuilder::new(MemoryStorage::new())
        .max_bytes(0)
        .build();
    assert!(matches!(result, Err(SvgError::Config(_))));
}
