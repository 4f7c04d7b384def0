use super::ShaderError;

/// Named WGSL snippets available to `#include <name>` directives.
///
/// Later inserts shadow earlier ones with the same name, so a material can
/// override a library chunk by inserting its own after the library set.
#[derive(Debug, Clone, Default)]
pub struct ChunkSet {
    chunks: Vec<(String, String)>,
}

impl ChunkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        match self.chunks.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = source,
            None => self.chunks.push((name, source)),
        }
    }

    pub fn extend(&mut self, other: &ChunkSet) {
        for (name, source) in &other.chunks {
            self.insert(name.clone(), source.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.chunks.iter().find(|(n, _)| n == name).map(|(_, s)| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|(n, _)| n.as_str())
    }
}

/// Recursively replaces `#include <name>` lines with the named chunk.
///
/// A directive must be alone on its line (leading whitespace allowed).
/// The same chunk may be included more than once; a chunk that includes
/// itself, directly or transitively, is an error.
pub fn expand(source: &str, chunks: &ChunkSet) -> Result<String, ShaderError> {
    let mut out = String::with_capacity(source.len() * 2);
    let mut stack = Vec::new();
    expand_into(source, chunks, &mut stack, &mut out)?;
    Ok(out)
}

fn expand_into(
    source: &str,
    chunks: &ChunkSet,
    stack: &mut Vec<String>,
    out: &mut String,
) -> Result<(), ShaderError> {
    for line in source.lines() {
        let Some(name) = include_target(line) else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(ShaderError::IncludeCycle { chain });
        }

        let chunk = chunks
            .get(name)
            .ok_or_else(|| ShaderError::UnknownChunk { name: name.to_string() })?;

        stack.push(name.to_string());
        expand_into(chunk, chunks, stack, out)?;
        stack.pop();
    }
    Ok(())
}

fn include_target(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("#include")?;
    let rest = rest.trim();
    let name = rest.strip_prefix('<')?.strip_suffix('>')?.trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_lines_are_replaced_recursively() {
        let chunks = ChunkSet::new()
            .with("outer", "let a = 1.0;\n#include <inner>")
            .with("inner", "let b = 2.0;");

        let out = expand("fn f() {\n    #include <outer>\n}", &chunks).unwrap();
        assert_eq!(out, "fn f() {\nlet a = 1.0;\nlet b = 2.0;\n}\n");
    }

    #[test]
    fn repeated_includes_are_allowed() {
        let chunks = ChunkSet::new().with("x", "x");
        let out = expand("#include <x>\n#include <x>", &chunks).unwrap();
        assert_eq!(out, "x\nx\n");
    }

    #[test]
    fn unknown_chunk_is_reported() {
        let err = expand("#include <missing>", &ChunkSet::new()).unwrap_err();
        assert_eq!(err, ShaderError::UnknownChunk { name: "missing".into() });
    }

    #[test]
    fn cycles_report_the_chain() {
        let chunks = ChunkSet::new()
            .with("a", "#include <b>")
            .with("b", "#include <a>");

        let err = expand("#include <a>", &chunks).unwrap_err();
        assert_eq!(
            err,
            ShaderError::IncludeCycle { chain: vec!["a".into(), "b".into(), "a".into()] }
        );
    }

    #[test]
    fn later_insert_shadows_earlier() {
        let mut chunks = ChunkSet::new().with("c", "old");
        chunks.extend(&ChunkSet::new().with("c", "new"));
        assert_eq!(chunks.get("c"), Some("new"));
    }

    #[test]
    fn non_directive_lines_pass_through() {
        let out = expand("// #include <x> in a comment", &ChunkSet::new()).unwrap();
        assert_eq!(out, "// #include <x> in a comment\n");
    }
}
