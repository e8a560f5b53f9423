use crate::core::document::XmlDocument;

/// Which kind of folder child a split unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Mapping,
    Session,
}

impl UnitKind {
    fn file_prefix(&self) -> &'static str {
        match self {
            UnitKind::Mapping => "mapping",
            UnitKind::Session => "session",
        }
    }
}

/// One folder child destined for its own file under the split output
/// directory.
#[derive(Debug, Clone)]
pub struct FolderUnit {
    pub kind: UnitKind,
    pub name: String,
    pub xml: String,
}

impl FolderUnit {
    pub fn file_name(&self) -> String {
        format!("{}-{}.xml", self.kind.file_prefix(), self.name)
    }
}

/// Self-contained source-side context for the language model: every SOURCE,
/// then every Source Qualifier transformation, then every TARGET, serialized
/// and joined by newlines.
pub fn source_context(doc: &XmlDocument) -> String {
    let root = doc.root();
    let mut parts: Vec<String> = Vec::new();

    for source in root.descendants("SOURCE") {
        parts.push(source.to_xml());
    }
    for transformation in root.descendants("TRANSFORMATION") {
        if transformation.attr("TYPE") == Some("Source Qualifier") {
            parts.push(transformation.to_xml());
        }
    }
    for target in root.descendants("TARGET") {
        parts.push(target.to_xml());
    }

    parts.join("\n")
}

/// Every MAPPING element serialized and joined by newlines.
pub fn mapping_context(doc: &XmlDocument) -> String {
    doc.root()
        .descendants("MAPPING")
        .into_iter()
        .map(|mapping| mapping.to_xml())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Split text into chunks of at most `chunk_size` characters. Chunks never
/// split a character; concatenating them reproduces the input. A zero size
/// yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == chunk_size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split units of the first FOLDER element: one unit per direct MAPPING or
/// SESSION child, in document order. Children without a NAME cannot be given
/// a file and are dropped.
pub fn folder_units(doc: &XmlDocument) -> Vec<FolderUnit> {
    let folder = match doc.root().descendants("FOLDER").into_iter().next() {
        Some(folder) => folder,
        None => return Vec::new(),
    };

    let mut units = Vec::new();
    for child in folder.children() {
        let kind = match child.tag() {
            "MAPPING" => UnitKind::Mapping,
            "SESSION" => UnitKind::Session,
            _ => continue,
        };
        let name = match child.attr("NAME") {
            Some(name) => name.to_string(),
            None => {
                tracing::debug!("folder {} child has no NAME; skipping", child.tag());
                continue;
            }
        };
        units.push(FolderUnit {
            kind,
            name,
            xml: child.to_xml(),
        });
    }
    units
}
