// Go source writer: indentation, function blocks, imports and temporaries

pub mod dispatch;
pub mod literals;

pub use dispatch::{label_name, CheckpointId, CheckpointSet, DispatchTable, DispatchTarget, FrameState};
pub use literals::{mangle_identifier, quote_string, IDENT_MARKER};

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// One level of indentation
pub const INDENT_UNIT: &str = "\t";

/// Pending exception slot declared by every function block
pub const PENDING_FAILURE: &str = "πE";

/// Call frame of the function being generated
pub const FRAME: &str = "πF";

/// A compiler-introduced variable and its Go type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TempVar {
    pub name: String,
    pub ty: String,
}

impl TempVar {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Accumulates the Go source for one module
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    indent_level: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Indent by `n` (negative dedents, stopping at column 0) until the guard drops
    pub fn indented(&mut self, n: isize) -> IndentGuard<'_> {
        let saved = self.indent_level;
        self.indent_level = saved.saturating_add_signed(n);
        IndentGuard {
            writer: self,
            saved,
        }
    }

    /// Run `f` indented by `n`; the previous level is restored however `f` exits
    pub fn with_indent<T, E>(
        &mut self,
        n: isize,
        f: impl FnOnce(&mut CodeWriter) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = self.indented(n);
        f(&mut guard)
    }

    /// Write each non-empty line of `text` at the current indentation
    pub fn write(&mut self, text: &str) {
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT_UNIT);
            }
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    /// Write the resumable wrapper around a function body.
    ///
    /// Each pass of the loop dispatches on the frame state: 0 runs the body
    /// from the top, a checkpoint jumps to its label. A checked call that
    /// fails leaves the exception in `πE` and continues the loop, which pops
    /// the innermost checkpoint and dispatches again. `body` must be aligned
    /// with its labels.
    pub fn write_function_block(&mut self, checkpoints: &CheckpointSet, body: &str) {
        let table = DispatchTable::from_checkpoints(checkpoints);

        self.write(&format!(
            "var {e} *πg.BaseException; _ = {e}",
            e = PENDING_FAILURE
        ));
        self.write(&format!(
            "for ; {f}.State() >= 0; {f}.PopCheckpoint() {{",
            f = FRAME
        ));
        {
            let mut loop_body = self.indented(1);
            loop_body.write(&format!("switch {}.State() {{", FRAME));
            for (state, target) in table.cases() {
                match target {
                    DispatchTarget::Jump(id) => {
                        loop_body.write(&format!("case {}: goto {}", state, label_name(id)))
                    }
                    _ => loop_body.write(&format!("case {}:", state)),
                }
            }
            loop_body.write("default: panic(\"unexpected function state\")");
            loop_body.write("}");
            loop_body.indented(-1).write(body);
            loop_body.write("return nil, nil");
        }
        self.write("}");
        self.write(&format!("return nil, {}", PENDING_FAILURE));
    }

    /// Write the jump target for checkpoint `id`, one level left of the body
    pub fn write_label(&mut self, id: CheckpointId) {
        self.indented(-1).write(&format!("{}:", label_name(id)));
    }

    /// Write `call`, storing its value in `result` if given, and loop back to
    /// the dispatch if it raised
    pub fn write_checked_call(&mut self, result: Option<&str>, call: &str) {
        let target = match result {
            Some(result) => format!("{}, {}", result, PENDING_FAILURE),
            None => PENDING_FAILURE.to_string(),
        };
        self.write(&format!(
            "if {} = {}; {} != nil {{",
            target, call, PENDING_FAILURE
        ));
        self.indented(1).write("continue");
        self.write("}");
    }

    /// Write a Go import block mapping package path to local alias, sorted by path
    pub fn write_import_block<I, K, V>(&mut self, imports: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sorted: BTreeMap<String, String> = imports
            .into_iter()
            .map(|(name, alias)| (name.into(), alias.into()))
            .collect();
        if sorted.is_empty() {
            return;
        }

        self.write("import (");
        {
            let mut block = self.indented(1);
            for (name, alias) in &sorted {
                block.write(&format!("{} {}", alias, quote_string(name)));
            }
        }
        self.write(")");
    }

    /// Declare each temporary once, sorted by name, and mark it used
    pub fn write_temp_declarations<'t>(&mut self, temps: impl IntoIterator<Item = &'t TempVar>) {
        let sorted: BTreeMap<&str, &str> = temps
            .into_iter()
            .map(|temp| (temp.name.as_str(), temp.ty.as_str()))
            .collect();
        for (name, ty) in sorted {
            self.write(&format!("var {0} {1}\n_ = {0}", name, ty));
        }
    }

    /// Write a comment pointing back at the Python source line
    pub fn write_source_position(&mut self, line: u32, text: &str) {
        let text = text.replace(['\r', '\n'], " ");
        self.write(&format!("// line {}: {}", line, text.trim_end()));
    }

    /// Final text of the module
    pub fn finish(self) -> String {
        self.output
    }
}

/// Indentation region; restores the previous level when dropped
pub struct IndentGuard<'w> {
    writer: &'w mut CodeWriter,
    saved: usize,
}

impl Deref for IndentGuard<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.writer.indent_level = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoints(ids: &[CheckpointId]) -> CheckpointSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_write_skips_blank_lines() {
        let mut writer = CodeWriter::new();
        writer.indented(1).write("a\n\nb\n");
        assert_eq!(writer.finish(), "\ta\n\tb\n");
    }

    #[test]
    fn test_nested_indent_restores_depth() {
        let mut writer = CodeWriter::new();
        {
            let mut outer = writer.indented(2);
            {
                let inner = outer.indented(3);
                assert_eq!(inner.indent_level(), 5);
            }
            assert_eq!(outer.indent_level(), 2);
            let _empty = outer.indented(-1);
        }
        assert_eq!(writer.indent_level(), 0);
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_dedent_saturates_and_restores() {
        let mut writer = CodeWriter::new();
        {
            let mut guard = writer.indented(-2);
            guard.write("x");
            assert_eq!(guard.indent_level(), 0);
        }
        let mut guard = writer.indented(1);
        guard.indented(-3).write("y");
        assert_eq!(guard.indent_level(), 1);
        drop(guard);
        assert_eq!(writer.finish(), "x\ny\n");
    }

    #[test]
    fn test_with_indent_restores_on_error() {
        let mut writer = CodeWriter::new();
        let result: Result<(), &str> = writer.with_indent(1, |w| {
            w.write("before");
            w.with_indent(1, |w| {
                w.write("deeper");
                Err::<(), _>("bail")
            })?;
            w.write("unreachable");
            Ok(())
        });
        assert_eq!(result, Err("bail"));
        assert_eq!(writer.indent_level(), 0);
        writer.write("after");
        assert_eq!(writer.finish(), "\tbefore\n\t\tdeeper\nafter\n");
    }

    #[test]
    fn test_function_block() {
        let mut body = CodeWriter::new();
        body.write("πF.PushCheckpoint(3)");
        body.write_checked_call(Some("πTemp001"), "µfoo.Call(πF, nil, nil)");
        body.write_label(3);
        body.write("return πTemp001, nil");
        let body = body.finish();

        let mut writer = CodeWriter::new();
        writer.write_function_block(&checkpoints(&[0, 3, 7]), &body);
        let expected = "\
var πE *πg.BaseException; _ = πE
for ; πF.State() >= 0; πF.PopCheckpoint() {
\tswitch πF.State() {
\tcase 0:
\tcase 3: goto Label3
\tcase 7: goto Label7
\tdefault: panic(\"unexpected function state\")
\t}
πF.PushCheckpoint(3)
if πTemp001, πE = µfoo.Call(πF, nil, nil); πE != nil {
\tcontinue
}
Label3:
return πTemp001, nil
\treturn nil, nil
}
return nil, πE
";
        assert_eq!(writer.finish(), expected);
    }

    #[test]
    fn test_function_block_indented() {
        let mut writer = CodeWriter::new();
        writer
            .indented(1)
            .write_function_block(&CheckpointSet::new(), "return nil, nil");
        let out = writer.finish();
        assert!(out.starts_with("\tvar πE"));
        assert!(out.contains("\n\t\tcase 0:\n\t\tdefault:"));
        assert!(out.contains("\n\treturn nil, nil\n\t\treturn nil, nil\n"));
        assert!(out.ends_with("\treturn nil, πE\n"));
    }

    #[test]
    fn test_label_at_top_level() {
        let mut writer = CodeWriter::new();
        writer.indented(2).write_label(4);
        writer.write_label(5);
        assert_eq!(writer.finish(), "\tLabel4:\nLabel5:\n");
    }

    #[test]
    fn test_checked_call_without_result() {
        let mut writer = CodeWriter::new();
        writer.write_checked_call(None, "πF.Raise(nil, nil, nil)");
        assert_eq!(
            writer.finish(),
            "if πE = πF.Raise(nil, nil, nil); πE != nil {\n\tcontinue\n}\n"
        );
    }

    #[test]
    fn test_import_block_sorted() {
        let mut first = CodeWriter::new();
        first.write_import_block([("os", "πos"), ("fmt", "πfmt"), ("a/b", "πb")]);
        let mut second = CodeWriter::new();
        second.write_import_block([("a/b", "πb"), ("os", "πos"), ("fmt", "πfmt")]);

        let out = first.finish();
        assert_eq!(out, second.finish());
        assert_eq!(out, "import (\n\tπb \"a/b\"\n\tπfmt \"fmt\"\n\tπos \"os\"\n)\n");
    }

    #[test]
    fn test_empty_import_block() {
        let mut writer = CodeWriter::new();
        writer.write_import_block(Vec::<(String, String)>::new());
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_temp_declarations_deduplicated() {
        let temps = [
            TempVar::new("πTemp002", "bool"),
            TempVar::new("πTemp001", "*πg.Object"),
            TempVar::new("πTemp002", "bool"),
        ];
        let mut writer = CodeWriter::new();
        writer.write_temp_declarations(&temps);
        assert_eq!(
            writer.finish(),
            "var πTemp001 *πg.Object\n_ = πTemp001\nvar πTemp002 bool\n_ = πTemp002\n"
        );
    }

    #[test]
    fn test_source_position() {
        let mut writer = CodeWriter::new();
        writer.write_source_position(12, "x = foo()\n");
        writer.write_source_position(13, "a\nb");
        assert_eq!(writer.finish(), "// line 12: x = foo()\n// line 13: a b\n");
    }
}
