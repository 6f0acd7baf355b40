//! Generated module synthesis
//!
//! Turns one document's rewritten blocks into a standalone Python module:
//! a preamble binding the base URL and test resource id from the
//! environment, one zero-argument `block_N` function per block, a `main`
//! calling them in order, and a `__main__` trailer. Output depends only on
//! the inputs, so regenerating an unchanged document is byte-identical.

use crate::config::PlaceholderProfile;
use crate::model::{block_function_name, BlockFunction, CodeBlock, GeneratedUnit, SecretClass};

const BANNER_WIDTH: usize = 70;
const INDENT: &str = "    ";
const INTERACTIVE_CALL: &str = "input(";

#[derive(Debug, Clone)]
pub struct ModuleSynthesizer {
    preamble: Vec<String>,
}

impl ModuleSynthesizer {
    pub fn new(profile: &PlaceholderProfile) -> Self {
        let preamble = vec![
            "import os".to_string(),
            String::new(),
            format!(
                "{} = os.environ.get(\"{}\", \"{}\")",
                profile.base_url_binding, profile.base_url_env_var, profile.default_base_url
            ),
            format!(
                "{} = os.environ.get(\"{}\", \"{}\")",
                profile.resource_id_binding,
                profile.resource_id_env_var,
                profile.placeholder_resource_id
            ),
        ];
        Self { preamble }
    }

    /// Builds the module for `source` from blocks that were already rewritten.
    ///
    /// Returns `None` when there is nothing to generate.
    pub fn synthesize(
        &self,
        source: &str,
        blocks: &[CodeBlock],
        class: SecretClass,
    ) -> Option<GeneratedUnit> {
        if blocks.is_empty() {
            return None;
        }

        let mut lines = vec![
            format!("# Auto-generated from {}", source),
            format!("# Do not edit: regenerated by {}", crate::NAME),
            String::new(),
        ];
        lines.extend(self.preamble.iter().cloned());

        let total = blocks.len();
        let rule = "=".repeat(BANNER_WIDTH);
        let mut functions = Vec::with_capacity(total);

        for (i, block) in blocks.iter().enumerate() {
            let number = i + 1;
            let name = block_function_name(number);

            lines.push(String::new());
            lines.push(String::new());
            lines.push(format!("def {}():", name));
            lines.push(String::new());
            lines.push(format!("{}# {}", INDENT, rule));
            lines.push(format!(
                "{}# Block {}/{} - {}:{}",
                INDENT, number, total, source, block.line
            ));
            lines.push(format!("{}# {}", INDENT, rule));
            lines.extend(indent_body(&block.code));

            functions.push(BlockFunction {
                name,
                block_number: number,
                source_line: block.line,
                requires_interactive_input: block.code.contains(INTERACTIVE_CALL),
                secret_class: class,
            });
        }

        lines.push(String::new());
        lines.push(String::new());
        lines.push("def main():".to_string());
        for function in &functions {
            lines.push(format!("{}{}()", INDENT, function.name));
        }

        lines.push(String::new());
        lines.push(String::new());
        lines.push("if __name__ == \"__main__\":".to_string());
        lines.push(format!("{}main()", INDENT));
        lines.push(String::new());

        Some(GeneratedUnit {
            source: source.to_string(),
            code: lines.join("\n"),
            functions,
        })
    }
}

/// Re-indents a block body one level. Whitespace-only lines become empty and
/// an all-blank body becomes `pass`.
fn indent_body(code: &str) -> Vec<String> {
    let body = code.trim_matches('\n');
    if body.trim().is_empty() {
        return vec![format!("{}pass", INDENT)];
    }

    body.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> ModuleSynthesizer {
        ModuleSynthesizer::new(&PlaceholderProfile::default())
    }

    fn block(code: &str, line: usize) -> CodeBlock {
        CodeBlock {
            code: code.to_string(),
            line,
        }
    }

    #[test]
    fn test_single_print_block() {
        let unit = synthesizer()
            .synthesize("v3/hello.mdx", &[block("print(\"hi\")\n", 7)], SecretClass::Sandbox)
            .unwrap();

        let expected = [
            "# Auto-generated from v3/hello.mdx",
            "# Do not edit: regenerated by docsnip",
            "",
            "import os",
            "",
            "_EDEN_BASE_URL = os.environ.get(\"EDEN_AI_BASE_URL\", \"https://api.edenai.run\")",
            "_EDEN_TEST_FILE_ID = os.environ.get(\"_EDEN_TEST_FILE_ID\", \"550e8400-e29b-41d4-a716-446655440000\")",
            "",
            "",
            "def block_1():",
            "",
            "    # ======================================================================",
            "    # Block 1/1 - v3/hello.mdx:7",
            "    # ======================================================================",
            "    print(\"hi\")",
            "",
            "",
            "def main():",
            "    block_1()",
            "",
            "",
            "if __name__ == \"__main__\":",
            "    main()",
            "",
        ]
        .join("\n");

        assert_eq!(unit.code, expected);
        assert_eq!(unit.code.matches("block_1()").count(), 1);
        assert_eq!(unit.functions.len(), 1);
        assert!(!unit.requires_interactive_input());
    }

    #[test]
    fn test_three_blocks_named_and_called_in_order() {
        let blocks = [block("a = 1\n", 3), block("b = 2\n", 8), block("c = 3\n", 15)];
        let unit = synthesizer()
            .synthesize("guide.mdx", &blocks, SecretClass::Sandbox)
            .unwrap();

        let names: Vec<&str> = unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["block_1", "block_2", "block_3"]);
        assert_eq!(
            unit.functions.iter().map(|f| f.source_line).collect::<Vec<_>>(),
            vec![3, 8, 15]
        );
        assert!(unit
            .code
            .contains("def main():\n    block_1()\n    block_2()\n    block_3()\n"));
        assert!(unit.code.contains("    # Block 2/3 - guide.mdx:8\n"));
        assert_eq!(unit.code.matches("\ndef block_").count(), 3);
    }

    #[test]
    fn test_empty_block_becomes_pass() {
        let unit = synthesizer()
            .synthesize("a.mdx", &[block("\n  \n\n", 2)], SecretClass::Sandbox)
            .unwrap();
        assert!(unit.code.contains("# ======================================================================\n    pass\n"));
    }

    #[test]
    fn test_body_reindented_with_blank_lines_cleared() {
        let code = "\n\nfor x in y:\n    print(x)\n   \nprint(\"done\")\n\n";
        let lines = indent_body(code);
        assert_eq!(
            lines,
            vec!["    for x in y:", "        print(x)", "", "    print(\"done\")"]
        );
    }

    #[test]
    fn test_interactive_input_and_secret_class_recorded() {
        let blocks = [block("name = input(\"Name: \")\n", 4), block("print(1)\n", 9)];
        let unit = synthesizer()
            .synthesize("v3/tutorials/track-optimize-spending.mdx", &blocks, SecretClass::Production)
            .unwrap();

        assert!(unit.functions[0].requires_interactive_input);
        assert!(!unit.functions[1].requires_interactive_input);
        assert!(unit.requires_interactive_input());
        assert!(unit.functions.iter().all(|f| f.secret_class == SecretClass::Production));
    }

    #[test]
    fn test_no_blocks_no_unit() {
        assert!(synthesizer().synthesize("a.mdx", &[], SecretClass::Sandbox).is_none());
    }

    #[test]
    fn test_deterministic_output() {
        let blocks = [block("x = 1\n", 2), block("", 6)];
        let first = synthesizer().synthesize("a.mdx", &blocks, SecretClass::Sandbox);
        let second = synthesizer().synthesize("a.mdx", &blocks, SecretClass::Sandbox);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_base_url_default() {
        let profile = PlaceholderProfile {
            default_base_url: "https://staging-api.example.run".to_string(),
            ..PlaceholderProfile::default()
        };
        let unit = ModuleSynthesizer::new(&profile)
            .synthesize("a.mdx", &[block("pass\n", 2)], SecretClass::Sandbox)
            .unwrap();
        assert!(unit
            .code
            .contains("_EDEN_BASE_URL = os.environ.get(\"EDEN_AI_BASE_URL\", \"https://staging-api.example.run\")"));
    }
}
