//! Init command implementation.

use anyhow::{Context, Result};
use solopress_core::Kind;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../solopress.yml.example");

/// Initialize a new solopress project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ solopress initialized in {:?}", root);
    println!("  - Edit solopress.yml to customize site metadata and theme");
    println!("  - Run `solopress new \"My First Post\"` to start writing");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("solopress.yml");
    if config_path.exists() {
        println!("solopress.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let content = root.join("content");
    for kind in Kind::ALL {
        let dir = content.join(kind.dir());
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let public = root.join("public");
    fs::create_dir_all(&public).with_context(|| format!("Failed to create {:?}", public))?;

    let home = content.join("home.md");
    if !home.exists() {
        fs::write(&home, HOME_TEMPLATE).with_context(|| format!("Failed to write {:?}", home))?;
        println!("Created {:?}", home);
    }

    Ok(())
}

const HOME_TEMPLATE: &str = r#"---
title: Home
description: Welcome to my corner of the web
---

# Hello!

This site is built with solopress. Edit `content/home.md` to change this page.
"#;
