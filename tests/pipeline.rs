//! End-to-end builds against a site directory on disk

use std::fs;
use std::path::Path;

use guide_site::config::SiteConfig;
use guide_site::content::{Block, Inline};
use guide_site::GuideSite;

fn write_guide(dir: &Path, slug: &str, title: &str, date: &str, body: &str) {
    let content = format!(
        "---\ntitle: \"{title}\"\ndate: \"{date}\"\ndescription: \"About {title}\"\n---\n{body}"
    );
    fs::write(dir.join(format!("{slug}.mdx")), content).unwrap();
}

fn site_with_guides() -> (tempfile::TempDir, GuideSite) {
    let dir = tempfile::tempdir().unwrap();
    let guides = dir.path().join("guides");
    fs::create_dir(&guides).unwrap();

    write_guide(&guides, "hello-world", "Hello", "2023-01-01", "# Hi\n");
    write_guide(
        &guides,
        "docker-basics",
        "Docker basics",
        "2023-04-12",
        "## Install\n\n<Image src=\"/docker.png\" alt=\"Docker\" />\n\n```sh\ndocker run hello-world\n```\n",
    );
    fs::write(guides.join("notes.txt"), "ignored").unwrap();

    let site = GuideSite::new(dir.path()).unwrap();
    (dir, site)
}

#[test]
fn test_directory_listing_and_render() {
    let (dir, _site) = site_with_guides();
    let guides_dir = dir.path().join("guides");

    let guides = guide_site::list_guides(&guides_dir).unwrap();
    let mut listed: Vec<_> = guides.iter().map(|g| g.slug.clone()).collect();
    listed.sort();
    assert_eq!(listed, guide_site::list_slugs(&guides_dir).unwrap());
    assert_eq!(listed, vec!["docker-basics", "hello-world"]);

    let rendered = guide_site::render_guide(&guides_dir, "hello-world").unwrap();
    assert_eq!(rendered.title, "Hello");
    assert_eq!(
        rendered.content.blocks,
        vec![Block::Heading {
            level: 1,
            id: "hi".to_string(),
            content: vec![Inline::text("Hi")],
        }]
    );
}

#[test]
fn test_missing_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("guides");
    assert!(guide_site::list_guides(&missing).unwrap_err().is_not_found());
    assert!(guide_site::list_slugs(&missing).unwrap_err().is_not_found());
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(guide_site::list_guides(dir.path()).unwrap().is_empty());
    assert!(guide_site::list_slugs(dir.path()).unwrap().is_empty());
}

#[test]
fn test_missing_guide_is_not_found() {
    let (dir, _site) = site_with_guides();
    let err = guide_site::render_guide(dir.path().join("guides"), "missing-slug").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_generate_writes_index_and_pages() {
    let (_dir, site) = site_with_guides();
    site.generate().unwrap();

    let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
    assert!(index.contains(r#"<a href="/guides/hello-world/">Hello</a>"#));
    assert!(index.contains(r#"<a href="/guides/docker-basics/">Docker basics</a>"#));
    // newest first
    assert!(index.find("docker-basics").unwrap() < index.find("hello-world").unwrap());

    let page = fs::read_to_string(site.public_dir.join("guides/docker-basics/index.html")).unwrap();
    assert!(page.contains("<h1>Docker basics</h1>"));
    assert!(page.contains(r#"<h2 id="install">Install</h2>"#));
    assert!(page.contains(r#"<img src="/docker.png" alt="Docker">"#));
    assert!(page.contains("highlight sh"));

    assert!(site.public_dir.join("guides/hello-world/index.html").exists());
    assert!(!site.public_dir.join("guides/notes").exists());
}

#[test]
fn test_broken_page_fails_build_but_keeps_others() {
    let (dir, site) = site_with_guides();
    let guides = dir.path().join("guides");
    write_guide(&guides, "chart", "Chart", "2022-01-01", "<Chart data={x} />\n");

    let err = site.generate().unwrap_err();
    assert!(err.to_string().contains("chart"));

    // neither the page nor a link to it is published
    let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
    assert!(!index.contains("/guides/chart/"));
    assert!(index.contains("/guides/hello-world/"));
    assert!(!site.public_dir.join("guides/chart/index.html").exists());
    assert!(site.public_dir.join("guides/hello-world/index.html").exists());
}

#[test]
fn test_component_with_array_prop_fails_build() {
    let (dir, site) = site_with_guides();
    write_guide(
        &dir.path().join("guides"),
        "chart",
        "Chart",
        "2022-01-01",
        "<Chart data={[1, 2]} />\n",
    );

    let report = guide_site::commands::generate::build(&site).unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "chart");
    assert!(report.failed[0].1.contains("unknown component <Chart>"));
    assert_eq!(report.indexed, 2);
}

#[test]
fn test_malformed_front_matter_skipped_in_index() {
    let (dir, site) = site_with_guides();
    fs::write(
        dir.path().join("guides/broken.mdx"),
        "---\ntitle: Broken\nno closing delimiter\n",
    )
    .unwrap();

    let report = guide_site::commands::generate::build(&site).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.pages, 2);
    assert!(report.failed.is_empty());
    assert!(!site.public_dir.join("guides/broken").exists());

    let guides_dir = dir.path().join("guides");
    let listed: Vec<_> = guide_site::list_guides(&guides_dir)
        .unwrap()
        .into_iter()
        .map(|g| g.slug)
        .collect();
    assert_eq!(guide_site::list_slugs(&guides_dir).unwrap(), listed);
}

#[test]
fn test_stale_pages_removed_on_rebuild() {
    let (dir, site) = site_with_guides();
    site.generate().unwrap();
    fs::remove_file(dir.path().join("guides/hello-world.mdx")).unwrap();

    site.generate().unwrap();
    assert!(!site.public_dir.join("guides/hello-world").exists());
}

#[test]
fn test_config_file_overrides() {
    let (dir, _) = site_with_guides();
    fs::write(
        dir.path().join("_config.yml"),
        "title: Katrina's guides\nroot: /docs/\npublic_dir: out\nindex:\n  order_by: slug\nhighlight:\n  enable: false\n",
    )
    .unwrap();

    let site = GuideSite::new(dir.path()).unwrap();
    assert_eq!(site.public_dir, dir.path().join("out"));
    site.generate().unwrap();

    let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
    assert!(index.contains("<title>Katrina&#39;s guides</title>"));
    assert!(index.contains(r#"href="/docs/guides/hello-world/""#));
    assert!(index.contains(r#"<link rel="canonical" href="http://example.com/docs/">"#));
    assert!(index.find("docker-basics").unwrap() < index.find("hello-world").unwrap());

    let page = fs::read_to_string(site.public_dir.join("guides/docker-basics/index.html")).unwrap();
    assert!(page.contains(r#"<pre><code class="language-sh">"#));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("_config.yml"), "index:\n  order_by: views\n").unwrap();
    assert!(GuideSite::new(dir.path()).is_err());
}

#[test]
fn test_clean_removes_public_dir() {
    let (_dir, site) = site_with_guides();
    site.generate().unwrap();
    assert!(site.public_dir.exists());

    site.clean().unwrap();
    assert!(!site.public_dir.exists());
    // cleaning twice is fine
    site.clean().unwrap();
}

#[test]
fn test_with_config_uses_custom_extension() {
    let dir = tempfile::tempdir().unwrap();
    let guides = dir.path().join("guides");
    fs::create_dir(&guides).unwrap();
    fs::write(
        guides.join("intro.md"),
        "---\ntitle: Intro\ndate: 2024-02-02\n---\nHello\n",
    )
    .unwrap();

    let config = SiteConfig {
        extension: "md".to_string(),
        ..Default::default()
    };
    let site = GuideSite::with_config(dir.path(), config);
    site.generate().unwrap();
    assert!(site.public_dir.join("guides/intro/index.html").exists());
}
