use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never belongs to readable page content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// How text nodes are joined when a subtree is flattened.
#[derive(Debug, Clone, Copy)]
pub struct TextOptions<'a> {
    pub separator: &'a str,
    /// Trim every text node and drop the ones left empty.
    pub trim: bool,
}

impl TextOptions<'_> {
    pub const LINES: TextOptions<'static> = TextOptions {
        separator: "\n",
        trim: true,
    };
}

/// A parsed HTML page. Lookups that find nothing return `None` or an empty
/// list; malformed markup is never an error.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.value().name() == tag)
    }

    pub fn by_tag_and_class(&self, tag: &str, class: &str) -> Vec<ElementRef<'_>> {
        self.elements()
            .filter(|el| el.value().name() == tag && el.value().classes().any(|c| c == class))
            .collect()
    }

    pub fn matching_attr<F>(&self, tag: &str, attr: &str, predicate: F) -> Vec<ElementRef<'_>>
    where
        F: Fn(&str) -> bool,
    {
        self.elements()
            .filter(|el| el.value().name() == tag)
            .filter(|el| el.value().attr(attr).is_some_and(&predicate))
            .collect()
    }

    pub fn text(&self, options: TextOptions<'_>) -> String {
        flatten(self.document.root_element(), options)
    }

    /// Detaches every element matching `selector`, returning how many were removed.
    pub fn strip(&mut self, selector: &Selector) -> usize {
        let ids: Vec<_> = self.document.select(selector).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.document.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }
}

pub fn flatten(element: ElementRef<'_>, options: TextOptions<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, options.trim, &mut parts);
    parts.join(options.separator)
}

/// Text of one block element as a single line, whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw = flatten(
        element,
        TextOptions {
            separator: "",
            trim: false,
        },
    );
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, trim: bool, parts: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text: &'a str = text;
                if !trim {
                    parts.push(text);
                } else if !text.trim().is_empty() {
                    parts.push(text.trim());
                }
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, trim, parts);
                }
            }
            _ => {}
        }
    }
}
