//! The structure of a document's display math, before any numbers exist.
//!
//! The tokenizer builds these values once; [`crate::numbering`] walks them to
//! assign labels. Keeping the two apart means "what is there" can be tested
//! without "what number does it get", and the reverse.

/// The numbered display environments LaTeX (with amsmath/empheq) provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathEnv {
    Equation,
    Align,
    Gather,
    Multline,
    Alignat,
    Xalignat,
    Flalign,
    Empheq,
    Eqnarray,
}

impl MathEnv {
    pub const ALL: [MathEnv; 9] = [
        MathEnv::Equation,
        MathEnv::Align,
        MathEnv::Gather,
        MathEnv::Multline,
        MathEnv::Alignat,
        MathEnv::Xalignat,
        MathEnv::Flalign,
        MathEnv::Empheq,
        MathEnv::Eqnarray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MathEnv::Equation => "equation",
            MathEnv::Align => "align",
            MathEnv::Gather => "gather",
            MathEnv::Multline => "multline",
            MathEnv::Alignat => "alignat",
            MathEnv::Xalignat => "xalignat",
            MathEnv::Flalign => "flalign",
            MathEnv::Empheq => "empheq",
            MathEnv::Eqnarray => "eqnarray",
        }
    }

    /// Splits `align*` into (`Align`, starred).
    pub fn parse(name: &str) -> Option<(MathEnv, bool)> {
        let (base, starred) = match name.strip_suffix('*') {
            Some(base) => (base, true),
            None => (name, false),
        };
        Self::ALL
            .into_iter()
            .find(|env| env.name() == base)
            .map(|env| (env, starred))
    }

    /// Environments that number every line rather than the whole block.
    ///
    /// `empheq` depends on the environment it wraps and is decided per use.
    pub fn is_alignment(self) -> bool {
        matches!(
            self,
            MathEnv::Align
                | MathEnv::Alignat
                | MathEnv::Xalignat
                | MathEnv::Flalign
                | MathEnv::Gather
                | MathEnv::Eqnarray
        )
    }
}

/// Structures inside a display environment that are processed on their own.
pub const NESTED_ENVIRONMENTS: [&str; 15] = [
    "aligned",
    "gathered",
    "split",
    "alignedat",
    "matrix",
    "pmatrix",
    "bmatrix",
    "Bmatrix",
    "vmatrix",
    "Vmatrix",
    "smallmatrix",
    "cases",
    "rcases",
    "dcases",
    "drcases",
];

pub fn is_nested_environment(name: &str) -> bool {
    NESTED_ENVIRONMENTS.contains(&name)
}

/// True for environment names whose `&` separates alignment columns.
pub fn is_alignment_name(name: &str) -> bool {
    match name {
        "aligned" | "alignedat" | "gathered" | "split" => true,
        other => MathEnv::parse(other).is_some_and(|(env, _)| env.is_alignment()),
    }
}

/// One top-level math construct of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathBlock {
    Display(DisplayMath),
    /// A `subequations` block and the display environments inside it.
    Subequations(Vec<DisplayMath>),
}

/// A `\begin{env} ... \end{env}` display environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMath {
    pub env: MathEnv,
    pub starred: bool,
    pub body: Body,
    /// Byte offset of `\begin` in the preprocessed text.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Ordinary content split at `\\`.
    Lines { alignment: bool, lines: Vec<Line> },
    /// Content holding nested structures; numbered as one unit.
    Nested {
        /// A suppression marker appears outside the nested structures.
        suppressed: bool,
        inner: Vec<NestedMath>,
    },
}

/// A nested structure such as `aligned` or `pmatrix`, split into its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedMath {
    pub name: String,
    pub lines: Vec<Line>,
}

/// One logical line: trimmed, separators normalized, markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub suppressed: bool,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suppressed: false,
        }
    }

    pub fn suppressed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suppressed: true,
        }
    }
}
