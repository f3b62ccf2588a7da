//! Link command handlers
//!
//! Links are addressed by their position in `linkhub link list`. Positions
//! change after every add, delete or move, so list again before reusing one.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use linkhub_core::{JsonRecordStore, LinkService};

use crate::output::Output;

/// Fields a link can be given on the command line
#[derive(Debug, Default)]
pub struct LinkFields {
    pub title: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    /// Extra `key=value` pairs
    pub extra: Vec<String>,
}

/// List all links
pub fn list(service: &LinkService<JsonRecordStore>, output: &Output) -> Result<()> {
    let links = service.list().context("Failed to load links")?;
    output.print_links(&links);
    Ok(())
}

/// Append a new link
pub fn add(
    service: &LinkService<JsonRecordStore>,
    url: String,
    mut fields: LinkFields,
    output: &Output,
) -> Result<()> {
    // Title defaults to the URL
    if fields.title.is_none() {
        fields.title = Some(url.clone());
    }
    fields.url = Some(url);

    let link = apply_fields(Map::new(), fields)?;
    let (index, link) = service
        .append(Value::Object(link))
        .context("Failed to add link")?;

    output.success(&format!("Added link at position {}", index));
    output.print_link(index, &link);
    Ok(())
}

/// Change fields of an existing link, keeping the others
pub fn edit(
    service: &LinkService<JsonRecordStore>,
    index: i64,
    fields: LinkFields,
    output: &Output,
) -> Result<()> {
    let links = service.list().context("Failed to load links")?;
    let current = usize::try_from(index)
        .ok()
        .and_then(|i| links.get(i))
        .with_context(|| format!("No link at position {} ({} links)", index, links.len()))?;

    let base = match current {
        Value::Object(map) => map.clone(),
        _ => bail!("Link at position {} is not an object and cannot be edited by field", index),
    };

    let link = service
        .replace_at(index, Value::Object(apply_fields(base, fields)?))
        .context("Failed to update link")?;

    output.success("Link updated");
    output.print_link(index as usize, &link);
    Ok(())
}

/// Delete a link
pub fn delete(service: &LinkService<JsonRecordStore>, index: i64, output: &Output) -> Result<()> {
    let removed = service.delete_at(index).context("Failed to delete link")?;
    let title = removed
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("(untitled)");

    output.success(&format!("Deleted link {}: {}", index, title));
    Ok(())
}

/// Move a link one position up or down
pub fn move_link(
    service: &LinkService<JsonRecordStore>,
    index: i64,
    direction: String,
    output: &Output,
) -> Result<()> {
    service
        .move_link_named(index, &direction)
        .context("Failed to move link")?;

    output.success(&format!("Moved link {} {}", index, direction));
    Ok(())
}

fn apply_fields(mut link: Map<String, Value>, fields: LinkFields) -> Result<Map<String, Value>> {
    for (key, value) in [
        ("title", fields.title),
        ("url", fields.url),
        ("image", fields.image),
    ] {
        if let Some(value) = value {
            link.insert(key.to_string(), Value::String(value));
        }
    }

    for pair in fields.extra {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid field '{}': expected key=value", pair);
        };
        if key.is_empty() {
            bail!("Invalid field '{}': key is empty", pair);
        }
        // JSON literals (numbers, booleans, objects) are kept typed
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        link.insert(key.to_string(), value);
    }

    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_service(temp_dir: &TempDir) -> LinkService<JsonRecordStore> {
        LinkService::new(JsonRecordStore::new(temp_dir.path().join("links.json")))
    }

    #[test]
    fn test_add_then_edit_link() {
        let temp_dir = TempDir::new().unwrap();
        let service = test_service(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        add(
            &service,
            "https://rust-lang.org".to_string(),
            LinkFields {
                extra: vec!["order=1".to_string()],
                ..Default::default()
            },
            &output,
        )
        .unwrap();
        assert_eq!(
            service.list().unwrap(),
            vec![json!({"title": "https://rust-lang.org", "url": "https://rust-lang.org", "order": 1})]
        );

        edit(
            &service,
            0,
            LinkFields {
                title: Some("Rust".to_string()),
                ..Default::default()
            },
            &output,
        )
        .unwrap();
        assert_eq!(
            service.list().unwrap(),
            vec![json!({"title": "Rust", "url": "https://rust-lang.org", "order": 1})]
        );
    }

    #[test]
    fn test_edit_out_of_range_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let service = test_service(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        assert!(edit(&service, 3, LinkFields::default(), &output).is_err());
        assert!(!service.store().path().exists());
    }

    #[test]
    fn test_apply_fields_sets_known_keys() {
        let link = apply_fields(
            Map::new(),
            LinkFields {
                title: Some("Rust".to_string()),
                url: Some("https://rust-lang.org".to_string()),
                image: None,
                extra: vec![],
            },
        )
        .unwrap();

        assert_eq!(
            Value::Object(link),
            json!({"title": "Rust", "url": "https://rust-lang.org"})
        );
    }

    #[test]
    fn test_apply_fields_keeps_existing() {
        let base = json!({"title": "Old", "url": "https://a.com", "pinned": true});
        let Value::Object(base) = base else {
            unreachable!()
        };

        let link = apply_fields(
            base,
            LinkFields {
                title: Some("New".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            Value::Object(link),
            json!({"title": "New", "url": "https://a.com", "pinned": true})
        );
    }

    #[test]
    fn test_apply_fields_extra_values() {
        let link = apply_fields(
            Map::new(),
            LinkFields {
                extra: vec![
                    "order=3".to_string(),
                    "hidden=false".to_string(),
                    "note=read later".to_string(),
                ],
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            Value::Object(link),
            json!({"order": 3, "hidden": false, "note": "read later"})
        );
    }

    #[test]
    fn test_apply_fields_rejects_bad_pairs() {
        for bad in ["novalue", "=x"] {
            let result = apply_fields(
                Map::new(),
                LinkFields {
                    extra: vec![bad.to_string()],
                    ..Default::default()
                },
            );
            assert!(result.is_err(), "{} should be rejected", bad);
        }
    }
}
