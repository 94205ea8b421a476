//! Integration tests for block scanning and extraction working together

use blockscan::blockscan::extraction::{extract_many, extract_nested, NestedMode};
use blockscan::blockscan::lexing::{TokenStyle, Tokenizer};
use blockscan::blockscan::parsing::{
    parse_blocks, parse_blocks_strict, strip_blocks, BlockHooks, Cursor, PatternHooks, Section,
};
use blockscan::blockscan::tree::{NodeId, Tree};
use blockscan::blockscan::ParseError;
use regex::Regex;

const FRAMES: &str = r#"
Frame Root {
  FrameTransformMatrix {
    1.0, 0.0, 0.0, 0.0;
  }
  Frame "Left Arm" {
    Mesh arm_mesh {
      4;
    }
  }
  // Frame Hidden {
  //   Mesh hidden_mesh { }
  // }
  Frame Head {
  }
}
"#;

/// Frames become nodes named after their second token; other blocks are
/// anonymous. Records the line number of every frame it opens.
#[derive(Default)]
struct FrameHooks {
    tokenizer: Tokenizer,
    frame_lines: Vec<usize>,
    open: Vec<bool>,
}

impl FrameHooks {
    fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new().preserve_case(true).strip_quotes(true),
            ..Self::default()
        }
    }

    fn tokens(&self, line: &str) -> Vec<String> {
        self.tokenizer.tokenize(line).unwrap_or_default()
    }
}

impl BlockHooks for FrameHooks {
    type Key = String;

    fn enter_block(&mut self, _tree: &Tree<String>, at: Cursor<'_>) -> i32 {
        i32::from(at.line.trim_end().ends_with('{'))
    }

    fn exit_block(&mut self, _tree: &Tree<String>, at: Cursor<'_>) -> i32 {
        -i32::from(at.line.trim() == "}")
    }

    fn enter_key_block(&mut self, _tree: &Tree<String>, at: Cursor<'_>) -> bool {
        let is_frame = self.tokens(at.line).first().is_some_and(|t| t == "Frame");
        self.open.push(is_frame);
        is_frame
    }

    fn exit_key_block(&mut self, _tree: &Tree<String>, _at: Cursor<'_>) -> bool {
        self.open.pop().unwrap_or(false)
    }

    fn step_in(&mut self, tree: &mut Tree<String>, at: Cursor<'_>) -> NodeId {
        self.frame_lines.push(at.line_number);
        let name = self.tokens(at.line).get(1).cloned().unwrap_or_default();
        tree.push_child(at.node, name)
    }

    fn step_out(&mut self, tree: &mut Tree<String>, at: Cursor<'_>) -> Option<NodeId> {
        tree.parent(at.node)
    }
}

fn without_comments(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect()
}

#[test]
fn test_frames_build_a_tree() {
    let lines = without_comments(FRAMES);
    let mut tree = Tree::new("scene".to_string());
    let mut hooks = FrameHooks::new();

    let summary = parse_blocks_strict(&lines, &mut tree, &mut hooks).unwrap();

    assert_eq!(summary.final_depth, 0);
    assert!(!summary.terminated_early);
    assert_eq!(summary.current, tree.root());
    assert_eq!(hooks.frame_lines, vec![2, 6, 11]);
    insta::assert_snapshot!(tree.to_string(), @r"
    scene
      Root
        Left Arm
        Head
    ");
}

#[test]
fn test_hook_state_survives_the_scan() {
    let mut hooks = FrameHooks::new();

    let mut first = Tree::new("first".to_string());
    parse_blocks("Frame A {\n}\nFrame B {\n}\n".lines(), &mut first, &mut hooks);
    let mut second = Tree::new("second".to_string());
    parse_blocks(["Frame C {", "}"], &mut second, &mut hooks);

    assert_eq!(hooks.frame_lines, vec![1, 3, 1]);
    assert!(hooks.open.is_empty());
    assert_eq!(first.children(first.root()).len(), 2);
    assert_eq!(second.find_child(second.root(), "C").map(|id| second.depth(id)), Some(1));
}

#[test]
fn test_unbalanced_input_fails_strict_scan() {
    let lines = ["Frame A {", "  Frame B {", "  }"];
    let mut tree = Tree::new("scene".to_string());
    let err = parse_blocks_strict(lines, &mut tree, FrameHooks::new()).unwrap_err();
    assert!(matches!(err, ParseError::MalformedNesting { line_number: 3, .. }));

    let mut tree = Tree::new("scene".to_string());
    let summary = parse_blocks(lines, &mut tree, FrameHooks::new());
    assert_eq!(summary.final_depth, 1);
    assert_eq!(tree.key(summary.current), "A");
}

#[test]
fn test_strip_then_outline() {
    let text = "\
section \"keep\" {
  value 1
}
debug \"drop\" {
  nested {
  }
}
section \"also kept\" {
}";
    let start = Regex::new(r"^debug\b").unwrap();
    let braces = |line: &str| line.matches('{').count() as i32 - line.matches('}').count() as i32;
    let kept = strip_blocks(text.lines(), |line| start.is_match(line), braces, braces);
    assert_eq!(kept.len(), 5);

    let hooks = PatternHooks::new(Regex::new(r"\{\s*$").unwrap(), Regex::new(r"^\s*\}").unwrap())
        .with_key(Regex::new(r#"^\w+\s+"([^"]+)""#).unwrap());
    let mut tree = Tree::new(Section::root("file"));
    parse_blocks_strict(&kept, &mut tree, hooks).unwrap();
    assert_eq!(tree.to_string(), "file\n  keep\n  also kept");
}

#[test]
fn test_flat_and_nested_extraction_on_one_file() {
    let text = "\
# material library
material stone
  diffuse \"Stone Grey.png\"
  size 64 64
material wood
  diffuse wood.png
  size 32 16 # half height
";
    let styles = [TokenStyle::new("diffuse"), TokenStyle::new("size").with_value_index(2)];
    let values = extract_many(text.lines(), &styles, true).unwrap();
    assert_eq!(values["diffuse"], vec!["Stone Grey.png", "wood.png"]);
    assert_eq!(values["size"], vec!["64", "16"]);

    let nested = extract_nested(
        text.lines(),
        "material",
        &["diffuse"],
        NestedMode::ByDefinitionValue,
    )
    .unwrap();
    let wood = &nested[&Some("wood".to_string())];
    assert_eq!(wood["diffuse"], vec!["wood.png"]);
    assert_eq!(nested.len(), 2);
}
