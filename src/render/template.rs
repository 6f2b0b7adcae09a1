use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::Context;
use crate::error::RenderError;
use crate::render::helpers::Helpers;

const INLINE_TEMPLATE_NAME: &str = "__inline__";

/// A template plus the partials it includes, extends or imports.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    path: Option<PathBuf>,
    sources: Vec<(String, String)>,
}

impl Template {
    /// A template held in memory, with no partials.
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            sources: vec![(name.clone(), source.into())],
            name,
            path: None,
        }
    }

    /// Load a template file.
    ///
    /// Partials named by `include`, `extends` or `import` tags are read from
    /// the template's directory, following their own references in turn.
    /// Files the template never names are left alone.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::TemplateNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut sources = referenced_partials(dir, &name, &source)?;
        sources.push((name.clone(), source));

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            sources,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Names of the partials registered alongside the main template.
    pub fn partials(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(move |name| *name != self.name)
    }

    /// Render against `context` with the given helper namespace.
    pub fn render(&self, context: &Context, helpers: &Helpers) -> Result<String, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        helpers.register(&mut tera);

        for (name, source) in &self.sources {
            tera::Template::new(name, None, source).map_err(|e| RenderError::SyntaxError {
                template: name.clone(),
                source: e,
            })?;
        }

        tera.add_raw_templates(
            self.sources
                .iter()
                .map(|(name, source)| (name.as_str(), source.as_str())),
        )
        .map_err(|e| RenderError::SyntaxError {
            template: self.name.clone(),
            source: e,
        })?;

        tera.render(&self.name, &context.to_tera())
            .map_err(|e| RenderError::EvaluationError {
                template: self.name.clone(),
                source: e,
            })
    }
}

/// Render a template held in memory.
pub fn render(
    template_source: &str,
    context: &Context,
    helpers: &Helpers,
) -> Result<String, RenderError> {
    Template::from_source(INLINE_TEMPLATE_NAME, template_source).render(context, helpers)
}

/// A template name pulled in by an `include`, `extends` or `import` tag.
#[derive(Debug, PartialEq, Eq)]
struct Reference {
    name: String,
    optional: bool,
}

fn referenced_partials(
    dir: &Path,
    root: &str,
    source: &str,
) -> Result<Vec<(String, String)>, RenderError> {
    let mut seen = HashSet::from([root.to_string()]);
    let mut pending = references(source);
    let mut partials = Vec::new();

    while let Some(reference) = pending.pop() {
        if seen.contains(&reference.name) {
            continue;
        }
        let path = dir.join(&reference.name);
        // `ignore missing` and include lists fall back at render time.
        if reference.optional && !path.is_file() {
            continue;
        }
        let partial = std::fs::read_to_string(&path)
            .map_err(|e| RenderError::TemplateNotFound { path, source: e })?;
        pending.extend(references(&partial));
        seen.insert(reference.name.clone());
        partials.push((reference.name, partial));
    }

    partials.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(partials)
}

/// Scan tag blocks for the template names they load, skipping comments and
/// `raw` sections.
fn references(source: &str) -> Vec<Reference> {
    let mut found = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        if let Some(comment) = after.strip_prefix('#') {
            rest = comment.find("#}").map_or("", |end| &comment[end + 2..]);
            continue;
        }
        let Some(tag) = after.strip_prefix('%') else {
            rest = after;
            continue;
        };
        let Some(end) = tag.find("%}") else {
            break;
        };
        let body = tag[..end].trim_matches(|c: char| c == '-' || c.is_whitespace());
        rest = &tag[end + 2..];

        match body.split_whitespace().next().unwrap_or_default() {
            "raw" => rest = skip_raw(rest),
            "include" | "extends" | "import" => {
                let names = string_literals(body);
                let optional = names.len() > 1 || body.contains("ignore missing");
                found.extend(names.into_iter().map(|name| Reference { name, optional }));
            }
            _ => {}
        }
    }

    found
}

fn skip_raw(rest: &str) -> &str {
    let Some(endraw) = rest.find("endraw") else {
        return "";
    };
    let tail = &rest[endraw..];
    tail.find("%}").map_or("", |end| &tail[end + 2..])
}

fn string_literals(body: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if matches!(c, '"' | '\'' | '`') {
            literals.push(chars.by_ref().take_while(|&n| n != c).collect());
        }
    }
    literals
}
