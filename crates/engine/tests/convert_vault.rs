//! End-to-end conversion of a small vault with an in-process converter

#![allow(clippy::unwrap_used, clippy::panic)]

use obs2html_config::DEFAULT_EXCLUDED_FOLDERS;
use obs2html_core::{DocumentConverter, RenderJob, Result as CoreResult};
use obs2html_engine::timestamps::{FileTimesSync, NoopTimeSync, source_time};
use obs2html_engine::{AbsPath, Template, VaultProcessor, plan};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Fills `$key$` placeholders from metadata and `$body$` with the Markdown
struct SubstitutingConverter;

impl DocumentConverter for SubstitutingConverter {
    fn render(&self, job: &RenderJob<'_>) -> CoreResult<String> {
        let mut html = fs::read_to_string(job.template)?;
        for (key, value) in job.metadata {
            html = html.replace(&format!("$if({key})$"), "");
            html = html.replace(&format!("${key}$"), value);
        }
        Ok(html.replace("$body$", job.markdown))
    }
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_vault(root: &Path) {
    write(root, ".obsidian/app.json", b"{}");
    write(
        root,
        "notes/a.md",
        b"---\nauthor: Ann\nsecret: s3cr3t\n---\nSee [[b]] and ==this==.\n\n![[photo.png|200]]\n",
    );
    write(root, "notes/b.md", b"# B\n");
    write(root, "notes/photo.png", &[0x89, b'P', b'N', b'G', 0x00, 0xff]);
    write(root, "private/secret.md", b"do not publish");
    write(root, "video.md", b"https://www.youtube.com/watch?v=dQw4w9WgXcQ\n");
}

struct Setup {
    _temp: TempDir,
    vault: AbsPath,
    output: AbsPath,
    template_path: std::path::PathBuf,
}

fn setup(template: &str) -> Setup {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("vault");
    sample_vault(&vault);
    let template_path = temp.path().join("user.html");
    fs::write(&template_path, template).unwrap();
    Setup {
        vault: AbsPath::new(vault).unwrap(),
        output: AbsPath::new(temp.path().join("site")).unwrap(),
        template_path,
        _temp: temp,
    }
}

fn excluded() -> Vec<String> {
    vec![".obsidian".to_string(), "private".to_string()]
}

#[test]
fn converts_mirrors_and_prunes() {
    let s = setup("<title>$title$</title>$body$");
    let items = plan(&s.vault, &excluded()).unwrap();
    let template = Template::load(&s.template_path).unwrap();
    let mut processor = VaultProcessor::new(
        s.vault.clone(),
        s.output.clone(),
        template,
        SubstitutingConverter,
        NoopTimeSync,
        "_resources",
    );

    let report = processor.run(&items, |_, _| {});
    assert!(!report.has_failures(), "{}", report.error_report());
    assert_eq!(report.converted, 3);
    assert_eq!(report.copied, 1);

    let out = s.output.as_path();
    let a = fs::read_to_string(out.join("notes/a.html")).unwrap();
    assert!(a.starts_with("<title>a</title>"));
    assert!(a.contains("[b](b.html)"));
    assert!(a.contains(r#"<span class="highlight">this</span>"#));
    assert!(a.contains("![](photo.png){ width=200px }"));
    assert!(!a.contains("s3cr3t"));

    assert!(out.join("notes/b.html").is_file());
    assert!(!out.join("private").exists());
    assert!(!out.join(".obsidian").exists());

    assert_eq!(
        fs::read(out.join("notes/photo.png")).unwrap(),
        fs::read(s.vault.as_path().join("notes/photo.png")).unwrap()
    );

    let video = fs::read_to_string(out.join("video.html")).unwrap();
    assert!(video.contains(r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
}

#[test]
fn author_reaches_output_only_when_declared() {
    let declared = setup("$if(author)$<meta name=\"author\" content=\"$author$\">$body$");
    let items = plan(&declared.vault, &excluded()).unwrap();
    let mut processor = VaultProcessor::new(
        declared.vault.clone(),
        declared.output.clone(),
        Template::load(&declared.template_path).unwrap(),
        SubstitutingConverter,
        NoopTimeSync,
        "_resources",
    );
    processor.run(&items, |_, _| {});
    let a = fs::read_to_string(declared.output.as_path().join("notes/a.html")).unwrap();
    assert!(a.contains(r#"<meta name="author" content="Ann">"#));

    let undeclared = setup("$body$");
    let items = plan(&undeclared.vault, &excluded()).unwrap();
    let mut processor = VaultProcessor::new(
        undeclared.vault.clone(),
        undeclared.output.clone(),
        Template::load(&undeclared.template_path).unwrap(),
        SubstitutingConverter,
        NoopTimeSync,
        "_resources",
    );
    processor.run(&items, |_, _| {});
    let a = fs::read_to_string(undeclared.output.as_path().join("notes/a.html")).unwrap();
    assert!(!a.contains("Ann"));
}

#[test]
fn rerun_overwrites_previous_output() {
    let s = setup("$body$");
    let items = plan(&s.vault, &excluded()).unwrap();
    let mut processor = VaultProcessor::new(
        s.vault.clone(),
        s.output.clone(),
        Template::load(&s.template_path).unwrap(),
        SubstitutingConverter,
        NoopTimeSync,
        "_resources",
    );
    processor.run(&items, |_, _| {});

    write(s.vault.as_path(), "notes/b.md", b"# B again\n");
    let report = processor.run(&items, |_, _| {});
    assert!(!report.has_failures());

    let b = fs::read_to_string(s.output.as_path().join("notes/b.html")).unwrap();
    assert!(b.contains("B again"));
}

#[test]
fn output_times_follow_source() {
    let s = setup("$body$");
    let items = plan(&s.vault, &excluded()).unwrap();
    let mut processor = VaultProcessor::new(
        s.vault.clone(),
        s.output.clone(),
        Template::load(&s.template_path).unwrap(),
        SubstitutingConverter,
        FileTimesSync,
        "_resources",
    );
    let report = processor.run(&items, |_, _| {});
    assert!(!report.has_failures());

    let source = s.vault.as_path().join("notes/b.md");
    let dest = s.output.as_path().join("notes/b.html");
    assert_eq!(
        fs::metadata(dest).unwrap().modified().unwrap(),
        source_time(&source).unwrap()
    );
}

#[test]
fn default_exclusions_keep_trash_out() {
    let s = setup("$body$");
    write(s.vault.as_path(), ".trash/secret.md", b"deleted note");
    write(s.vault.as_path(), "_templates/daily.md", b"{{date}}");

    let folders: Vec<String> = DEFAULT_EXCLUDED_FOLDERS.iter().map(ToString::to_string).collect();
    let items = plan(&s.vault, &folders).unwrap();
    let planned: Vec<String> = items
        .iter()
        .map(|item| item.rel.as_path().to_string_lossy().replace('\\', "/"))
        .collect();
    assert!(!planned.iter().any(|p| p.contains("secret.md") && p.starts_with(".trash")));
    assert!(!planned.iter().any(|p| p.starts_with("_templates") || p.starts_with(".obsidian")));

    let mut processor = VaultProcessor::new(
        s.vault.clone(),
        s.output.clone(),
        Template::load(&s.template_path).unwrap(),
        SubstitutingConverter,
        NoopTimeSync,
        "_resources",
    );
    let report = processor.run(&items, |_, _| {});
    assert!(!report.has_failures(), "{}", report.error_report());
    assert!(!s.output.as_path().join(".trash").exists());
    assert!(s.output.as_path().join("notes/a.html").is_file());
}
