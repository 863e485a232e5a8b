use regex_automata::dfa::onepass;
use regex_automata::nfa::thompson::{self, backtrack::BoundedBacktracker, NFA};
use regex_syntax::hir::{Class, Hir, HirKind, Look};

use super::{Analyze, Descriptor, GatewayError, Text};

/// Default NFA size limit, matching RE2's default `max_mem`.
pub const DEFAULT_MAX_MEM: usize = 8 << 20;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineOptions {
    pub max_mem: usize,
}

impl Default for EngineOptions {
    fn default() -> EngineOptions {
        EngineOptions {
            max_mem: DEFAULT_MAX_MEM,
        }
    }
}

/// Analysis module backed by `regex-syntax` and `regex-automata`.
#[derive(Debug)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    /// Build the module and make sure it can compile a trivial program.
    pub fn init(options: EngineOptions) -> Result<Engine, GatewayError> {
        let engine = Engine { options };

        let probe = regex_syntax::parse("a").map_err(|e| GatewayError::Unavailable {
            reason: e.to_string(),
        })?;
        engine
            .compile(&probe)
            .map_err(|e| GatewayError::Unavailable {
                reason: e.to_string(),
            })?;

        Ok(engine)
    }

    fn compile(&self, hir: &Hir) -> Result<NFA, thompson::BuildError> {
        thompson::Compiler::new()
            .configure(NFA::config().nfa_size_limit(Some(self.options.max_mem)))
            .build_from_hir(hir)
    }

    fn analyze(&self, pattern: &Text) -> Descriptor {
        let source = match std::str::from_utf8(pattern.as_bytes()) {
            Ok(source) => source,
            Err(_) => {
                return Descriptor::failed(
                    pattern.clone(),
                    "failed to parse pattern: pattern is not valid UTF-8".to_string(),
                )
            }
        };

        let regexp = match regex_syntax::parse(source) {
            Ok(hir) => hir,
            Err(e) => return Descriptor::failed(pattern.clone(), format!("failed to parse pattern: {}", e)),
        };

        let mut info = Descriptor {
            pattern: pattern.clone(),
            ..Descriptor::default()
        };

        let suffix = match required_prefix(&regexp) {
            Some(split) => {
                info.prefix = Text::Bytes(split.prefix);
                info.prefix_foldcase = split.foldcase;
                split.suffix
            }
            None => regexp.clone(),
        };

        let prog = match self.compile(&suffix) {
            Ok(nfa) => nfa,
            Err(e) => {
                tracing::debug!(error = %e, "forward compile failed");
                return Descriptor::failed(pattern.clone(), "failed to compile forward Prog".to_string());
            }
        };

        if let Some((prefix, foldcase)) = accel_prefix(&regexp) {
            info.accel_prefix = Text::Bytes(prefix);
            info.accel_prefix_foldcase = foldcase;
        }

        info.num_captures = suffix.properties().explicit_captures_len();
        info.is_one_pass = onepass::DFA::builder().build_from_nfa(prog.clone()).is_ok();
        info.can_bit_state = BoundedBacktracker::new_from_nfa(prog.clone())
            .map(|bt| bt.max_haystack_len() > 0)
            .unwrap_or(false);
        info.bytecode = Text::Str(format!("{:?}", prog));
        info.bytemap = Text::Str(dump_byte_map(&prog));

        info
    }
}

impl Analyze for Engine {
    fn describe(&self, pattern: &Text) -> Result<Descriptor, GatewayError> {
        Ok(self.analyze(pattern))
    }
}

/// A literal split off the front of an anchored regex.
#[derive(Debug)]
struct PrefixSplit {
    prefix:   Vec<u8>,
    foldcase: bool,
    suffix:   Hir,
}

/// The regex must be a concatenation of one or more start anchors, then
/// a literal, then the rest. Anchors alone give an empty prefix.
fn required_prefix(hir: &Hir) -> Option<PrefixSplit> {
    let subs = match hir.kind() {
        HirKind::Concat(subs) => subs,
        _ => return None,
    };

    let anchors = subs
        .iter()
        .take_while(|sub| matches!(sub.kind(), HirKind::Look(Look::Start)))
        .count();
    if anchors == 0 {
        return None;
    }

    let rest = &subs[anchors..];
    let (prefix, foldcase, taken) = leading_literal(rest);
    if taken == 0 && !rest.is_empty() {
        return None;
    }

    // Keep the suffix anchored.
    let mut suffix = vec![Hir::look(Look::Start)];
    suffix.extend(rest[taken..].iter().cloned());

    Some(PrefixSplit {
        prefix,
        foldcase,
        suffix: Hir::concat(suffix),
    })
}

/// A literal the regex must begin with, looking through capture groups.
fn accel_prefix(hir: &Hir) -> Option<(Vec<u8>, bool)> {
    match hir.kind() {
        HirKind::Capture(cap) => accel_prefix(&cap.sub),
        HirKind::Concat(subs) => match subs.first().map(Hir::kind) {
            Some(HirKind::Capture(cap)) => accel_prefix(&cap.sub),
            _ => {
                let (prefix, foldcase, taken) = leading_literal(subs);
                if taken == 0 {
                    None
                } else {
                    Some((prefix, foldcase))
                }
            }
        },
        _ => {
            let (prefix, foldcase, taken) = leading_literal(std::slice::from_ref(hir));
            if taken == 0 {
                None
            } else {
                Some((prefix, foldcase))
            }
        }
    }
}

/// Collect a literal string from the front of `subs`. Returns the bytes,
/// whether they fold case, and how many elements were consumed.
///
/// A case-sensitive literal is taken on its own. Otherwise the run joins
/// case-folded letters with literals that have no letters in them, so
/// `(?i)a1b` gives `a1b`. Non-ASCII case folds are not recognized and end
/// the run: `(?i)straße` gives `stra`.
fn leading_literal(subs: &[Hir]) -> (Vec<u8>, bool, usize) {
    let mut prefix = Vec::new();
    let mut foldcase = false;
    let mut taken = 0;

    for sub in subs {
        match sub.kind() {
            HirKind::Literal(lit) if lit.0.iter().any(u8::is_ascii_alphabetic) => {
                if taken == 0 {
                    return (lit.0.to_vec(), false, 1);
                }
                break;
            }
            HirKind::Literal(lit) => prefix.extend_from_slice(&lit.0),
            HirKind::Class(class) => match folded_letter(class) {
                Some(letter) => {
                    prefix.push(letter);
                    foldcase = true;
                }
                None => break,
            },
            _ => break,
        }
        taken += 1;
    }

    (prefix, foldcase, taken)
}

/// If the class is exactly the case variants of one ASCII letter, return
/// it in lower case. Non-ASCII variants (the Kelvin sign for `k`, the long
/// s for `s`) are allowed alongside.
fn folded_letter(class: &Class) -> Option<u8> {
    let mut members = Vec::new();
    match class {
        Class::Unicode(cls) => {
            for range in cls.ranges() {
                if range.start() != range.end() {
                    return None;
                }
                members.push(range.start());
            }
        }
        Class::Bytes(cls) => {
            for range in cls.ranges() {
                if range.start() != range.end() {
                    return None;
                }
                members.push(range.start() as char);
            }
        }
    }

    let ascii: Vec<char> = members.iter().copied().filter(char::is_ascii).collect();
    match ascii.as_slice() {
        &[upper, lower] if upper.is_ascii_uppercase() && lower == upper.to_ascii_lowercase() => {
            Some(lower as u8)
        }
        _ => None,
    }
}

/// One line per run of bytes sharing an equivalence class.
fn dump_byte_map(nfa: &NFA) -> String {
    let classes = nfa.byte_classes();
    let mut map = String::new();
    let mut lo: u16 = 0;

    while lo < 256 {
        let class = classes.get(lo as u8);
        let mut hi = lo;
        while hi < 255 && classes.get((hi + 1) as u8) == class {
            hi += 1;
        }
        map.push_str(&format!("[{:02x}-{:02x}] -> {}\n", lo, hi, class));
        lo = hi + 1;
    }

    map
}
