use crate::util::Code;
use crate::{ParseTree, TreeKind};
use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

impl Display for TreeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeKind::Rule(name) => write!(f, "{}", name),
            TreeKind::Token => write!(f, "token"),
            TreeKind::Separator => write!(f, "separator"),
            TreeKind::List => write!(f, "list"),
        }
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let children_string = self.children.iter().map(|c| format!("{}", c));
        f.debug_struct("")
            .field("value", &(&self.kind, &self.start, &self.end))
            .field("children", &children_string)
            .finish()
    }
}
impl Debug for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug_struct = f.debug_struct("ParseTree");
        debug_struct
            .field("kind", &format!("{}", self.kind))
            .field("start", &self.start)
            .field("end", &self.end);
        if let Some(capture) = &self.capture {
            debug_struct.field("capture", capture);
        }
        if !self.children.is_empty() {
            debug_struct.field("children", &self.children);
        }
        debug_struct.finish()
    }
}

impl ParseTree {
    pub fn new(
        kind: TreeKind,
        start: usize,
        end: usize,
        capture: Option<Rc<str>>,
        children: Vec<ParseTree>,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            capture,
            children,
        }
    }

    /// Create a leaf node covering a terminal match.
    pub fn leaf(kind: TreeKind, start: usize, end: usize, capture: Option<Rc<str>>) -> Self {
        ParseTree::new(kind, start, end, capture, Vec::with_capacity(0))
    }

    /// The rule name of this node, when it is a rule node.
    pub fn rule_name(&self) -> Option<&str> {
        match &self.kind {
            TreeKind::Rule(name) => Some(name),
            _ => None,
        }
    }

    /// The input slice this node covers.
    pub fn text<'c>(&self, code: &Code<'c>) -> &'c str {
        code.slice(self.start, self.end)
    }

    /// Search through all nested children and return the first node the
    /// predicate accepts.
    pub fn find<TF: Fn(&ParseTree) -> bool>(&self, p: &TF) -> Option<&ParseTree> {
        if p(self) {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find(p))
        }
    }

    /// Find the first nested node derived by the given rule.
    pub fn find_rule(&self, name: &str) -> Option<&ParseTree> {
        self.find(&|tree| tree.rule_name() == Some(name))
    }

    /// Return all nested nodes derived by the given rule.
    pub fn list_rules<'this>(&'this self, name: &str) -> Vec<&'this ParseTree> {
        let mut list: Vec<&'this ParseTree> = Vec::new();
        self.walk(&mut list, &|tree, list| {
            if tree.rule_name() == Some(name) {
                list.push(tree);
            }
        });
        list
    }

    /// The direct or nested child bound to the given capture name, without
    /// descending into other rule nodes.
    pub fn child_by_capture(&self, name: &str) -> Option<&ParseTree> {
        fn scan<'t>(tree: &'t ParseTree, name: &str) -> Option<&'t ParseTree> {
            for child in &tree.children {
                if child.capture.as_deref() == Some(name) {
                    return Some(child);
                }
                if child.rule_name().is_none() {
                    if let Some(found) = scan(child, name) {
                        return Some(found);
                    }
                }
            }
            None
        }
        scan(self, name)
    }

    pub fn contains_rule(&self, name: &str) -> bool {
        self.rule_name() == Some(name) || self.children.iter().any(|c| c.contains_rule(name))
    }

    /// All leaf nodes, left to right. Concatenating their spans reproduces
    /// the parsed input slice.
    pub fn leaves(&self) -> Vec<&ParseTree> {
        let mut list = Vec::new();
        self.walk(&mut list, &|tree, list| {
            if tree.children.is_empty() && tree.start != tree.end {
                list.push(tree);
            }
        });
        list
    }

    fn walk<'this, TR, TF: Fn(&'this Self, &mut TR)>(&'this self, r: &mut TR, p: &TF) {
        p(self, r);
        self.children.iter().for_each(|child| child.walk(r, p));
    }
}

impl TreeItem for ParseTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match &self.capture {
            Some(capture) => write!(f, "{}:{} # {}-{}", capture, self.kind, self.start, self.end),
            None => write!(f, "{} # {}-{}", self.kind, self.start, self.end),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

impl ParseTree {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
