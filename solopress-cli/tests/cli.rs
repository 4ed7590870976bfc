use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn solopress(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("solopress").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn init_scaffolds_and_never_overwrites() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    solopress(dir.path()).arg("init").assert().success();

    let config = dir.path().join("solopress.yml");
    assert!(config.is_file());
    for sub in ["content/blog", "content/events", "content/podcast", "public"] {
        assert!(dir.path().join(sub).is_dir(), "missing {}", sub);
    }
    assert!(dir.path().join("content/home.md").is_file());

    fs::write(&config, "site_title: Mine\nnav_links: []\n")?;
    solopress(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&config)?, "site_title: Mine\nnav_links: []\n");
    Ok(())
}

#[test]
fn new_writes_template_and_refuses_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    solopress(dir.path())
        .args(["new", "Hello", "World", "--date", "2024-11-05"])
        .assert()
        .success();

    let post = dir.path().join("content/blog/2024/hello-world.md");
    let text = fs::read_to_string(&post)?;
    assert!(text.contains("title: \"Hello World\""));
    assert!(text.contains("date: 2024-11-05"));
    assert!(text.contains("published: false"));

    solopress(dir.path())
        .args(["new", "Hello", "World", "--date", "2024-11-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&post)?, text);
    Ok(())
}

#[test]
fn new_event_goes_in_flat_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    solopress(dir.path())
        .args(["new", "Launch Party", "--kind", "events", "--date", "2025-07-01"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("content/events/launch-party.md"))?;
    assert!(text.contains("event_date: 2025-07-01"));
    Ok(())
}

#[test]
fn new_rejects_bad_date() {
    let dir = tempdir().unwrap();
    solopress(dir.path())
        .args(["new", "Post", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn build_renders_site() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    solopress(dir.path()).arg("init").assert().success();

    fs::create_dir_all(dir.path().join("content/blog/2025"))?;
    fs::write(
        dir.path().join("content/blog/2025/first.md"),
        "---\ntitle: First Post\ndate: 2025-02-01\ntags: [rust]\n---\n\nHello **there**.\n",
    )?;
    fs::write(
        dir.path().join("content/events/meetup.md"),
        "---\ntitle: Meetup\nevent_date: 2025-08-01\nlocation: Berlin\n---\n\nCome along.\n",
    )?;
    // Drafts are not built
    solopress(dir.path())
        .args(["new", "Secret", "--date", "2025-03-01"])
        .assert()
        .success();

    solopress(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 documents"));

    let dist = dir.path().join("dist");
    let post = fs::read_to_string(dist.join("blog/2025/first.html"))?;
    assert!(post.contains("<title>First Post | My Solo Site</title>"));
    assert!(post.contains("<strong>there</strong>"));
    assert!(post.contains("/tags/rust.html"));

    assert!(dist.join("blog/index.html").is_file());
    assert!(dist.join("events/meetup.html").is_file());
    assert!(dist.join("tags/rust.html").is_file());
    assert!(dist.join("assets/covers/2025/first.svg").is_file());
    assert!(dist.join("assets/favicon.svg").is_file());
    assert!(dist.join("assets/hero.svg").is_file());
    assert!(!dist.join("blog/2025/secret.html").exists());

    let search = fs::read_to_string(dist.join("search.json"))?;
    assert!(search.contains("/blog/2025/first.html"));
    assert!(!search.contains("Secret"));

    let rss = fs::read_to_string(dist.join("rss.xml"))?;
    assert!(rss.contains("https://example.com/blog/2025/first.html"));

    let sitemap = fs::read_to_string(dist.join("sitemap.xml"))?;
    assert!(sitemap.contains("https://example.com/events/meetup.html"));
    assert!(fs::read_to_string(dist.join("robots.txt"))?.contains("Sitemap: https://example.com/sitemap.xml"));
    Ok(())
}

#[test]
fn build_requires_nav_links() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("solopress.yml"), "site_title: Broken\n")?;

    solopress(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nav_links"));
    Ok(())
}

#[test]
fn build_without_config_fails() {
    let dir = tempdir().unwrap();
    solopress(dir.path())
        .args(["--config", "missing.yml", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
