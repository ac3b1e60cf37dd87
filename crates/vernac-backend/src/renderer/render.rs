// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders the sentence AST to vernacular text.
//! Pure serialization - no decisions beyond whitespace and parentheses.

use super::writer::{render_to_string, VernacWriter};
use crate::target::{
    Binder, Definition, Inductive, MatchArm, RecordDef, Sentence, TargetTerm, TargetType,
};
use std::fmt::Write;

/// Precedence levels, loosest first.
const PREC_ARROW: u8 = 0;
const PREC_PROD: u8 = 1;
const PREC_APP: u8 = 2;
const PREC_ATOM: u8 = 3;

/// Render an ordered sentence sequence to the final text.
///
/// Sentences are separated by one blank line; consecutive require
/// directives stay adjacent.
pub fn render_sentences(sentences: &[Sentence]) -> String {
    render_to_string(|w| {
        for (i, sentence) in sentences.iter().enumerate() {
            if i > 0 {
                let adjacent_requires = matches!(sentences[i - 1], Sentence::Require { .. })
                    && matches!(sentence, Sentence::Require { .. });
                if !adjacent_requires {
                    w.newline();
                }
            }
            render_sentence(sentence, w);
        }
    })
}

/// Render a single sentence, newline-terminated.
pub fn render_sentence<W: Write>(sentence: &Sentence, w: &mut VernacWriter<W>) {
    match sentence {
        Sentence::Comment(text) => {
            w.line(&format!("(* {text} *)"));
        }

        Sentence::Require { module } => {
            w.line(&format!("Require Import {module}."));
        }

        Sentence::Axiom { name, ty } => {
            w.write(&format!("Axiom {name} : "));
            render_type(ty, w, PREC_ARROW);
            w.line(".");
        }

        Sentence::TypeAbbrev { name, params, body } => {
            w.write(&format!("Definition {name}"));
            render_binders(params, w);
            w.write(" : Type := ");
            render_type(body, w, PREC_ARROW);
            w.line(".");
        }

        Sentence::Inductive(ind) => render_inductive(ind, w),
        Sentence::Record(rec) => render_record(rec, w),
        Sentence::Definition(def) => render_definition(def, w),
    }
}

fn render_inductive<W: Write>(ind: &Inductive, w: &mut VernacWriter<W>) {
    w.write(&format!("Inductive {}", ind.name));
    render_binders(&ind.params, w);
    w.write(" : ");
    render_type(&ind.arity, w, PREC_ARROW);
    w.write(" :=");
    if ind.ctors.is_empty() {
        w.line(".");
        return;
    }
    w.newline();
    for (i, ctor) in ind.ctors.iter().enumerate() {
        w.write(&format!("| {} : ", ctor.name));
        render_type(&ctor.ty, w, PREC_ARROW);
        if i + 1 == ind.ctors.len() {
            w.write(".");
        }
        w.newline();
    }
}

fn render_record<W: Write>(rec: &RecordDef, w: &mut VernacWriter<W>) {
    w.write(&format!("Record {}", rec.name));
    render_binders(&rec.params, w);
    w.line(" : Type := {");
    w.indent();
    for (i, (name, ty)) in rec.fields.iter().enumerate() {
        w.write(&format!("{name} : "));
        render_type(ty, w, PREC_ARROW);
        if i + 1 < rec.fields.len() {
            w.write(";");
        }
        w.newline();
    }
    w.dedent();
    w.line("}.");
}

fn render_definition<W: Write>(def: &Definition, w: &mut VernacWriter<W>) {
    w.write(&format!("Definition {}", def.name));
    render_binders(&def.binders, w);
    if let Some(ret) = &def.ret {
        w.write(" : ");
        render_type(ret, w, PREC_ARROW);
    }
    w.write(" :=");
    if is_multiline(&def.body) {
        w.newline();
        w.indent();
        render_term(&def.body, w, PREC_ARROW);
        w.write(".");
        w.dedent();
        w.newline();
    } else {
        w.write(" ");
        render_term(&def.body, w, PREC_ARROW);
        w.line(".");
    }
}

/// Whether a term needs the indented multi-line definition form.
fn is_multiline(term: &TargetTerm) -> bool {
    match term {
        TargetTerm::Ref(_) => false,
        TargetTerm::Fun { .. } | TargetTerm::Match { .. } => true,
        TargetTerm::App(head, args) => is_multiline(head) || args.iter().any(is_multiline),
    }
}

fn render_binders<W: Write>(binders: &[Binder], w: &mut VernacWriter<W>) {
    for binder in binders {
        w.write(" ");
        render_binder(binder, w);
    }
}

fn render_binder<W: Write>(binder: &Binder, w: &mut VernacWriter<W>) {
    match binder {
        Binder::Explicit { name, ty } => {
            w.write(&format!("({name} : "));
            render_type(ty, w, PREC_ARROW);
            w.write(")");
        }
        Binder::Implicit { name, ty } => {
            w.write(&format!("{{{name} : "));
            render_type(ty, w, PREC_ARROW);
            w.write("}");
        }
        Binder::Class(constraint) => {
            w.write("`{");
            render_type(constraint, w, PREC_ARROW);
            w.write("}");
        }
    }
}

fn render_type<W: Write>(ty: &TargetType, w: &mut VernacWriter<W>, min: u8) {
    let prec = match ty {
        TargetType::Arrow(..) | TargetType::Forall { .. } => PREC_ARROW,
        TargetType::Prod(_) => PREC_PROD,
        TargetType::App(..) => PREC_APP,
        TargetType::Sort | TargetType::Var(_) | TargetType::Ref(_) => PREC_ATOM,
    };
    let parens = prec < min;
    if parens {
        w.write("(");
    }
    match ty {
        TargetType::Sort => w.write("Type"),
        TargetType::Var(name) | TargetType::Ref(name) => w.write(name),

        TargetType::App(head, args) => {
            render_type(head, w, PREC_ATOM);
            for arg in args {
                w.write(" ");
                render_type(arg, w, PREC_ATOM);
            }
        }

        TargetType::Arrow(domain, codomain) => {
            render_type(domain, w, PREC_PROD);
            w.write(" -> ");
            render_type(codomain, w, PREC_ARROW);
        }

        TargetType::Prod(items) => {
            w.sep_with(" * ", items, |w, item| render_type(item, w, PREC_APP));
        }

        TargetType::Forall { binders, body } => {
            w.write("forall");
            render_binders(binders, w);
            w.write(", ");
            render_type(body, w, PREC_ARROW);
        }
    }
    if parens {
        w.write(")");
    }
}

fn render_term<W: Write>(term: &TargetTerm, w: &mut VernacWriter<W>, min: u8) {
    let prec = match term {
        TargetTerm::Fun { .. } => PREC_ARROW,
        TargetTerm::App(..) => PREC_APP,
        // Delimited by `end`, so never needs parentheses.
        TargetTerm::Ref(_) | TargetTerm::Match { .. } => PREC_ATOM,
    };
    let parens = prec < min;
    if parens {
        w.write("(");
    }
    match term {
        TargetTerm::Ref(name) => w.write(name),

        TargetTerm::App(head, args) => {
            render_term(head, w, PREC_ATOM);
            for arg in args {
                w.write(" ");
                render_term(arg, w, PREC_ATOM);
            }
        }

        TargetTerm::Fun { binders, body } => {
            w.write("fun");
            render_binders(binders, w);
            w.write(" =>");
            if is_multiline(body) {
                w.newline();
                w.indent();
                render_term(body, w, PREC_ARROW);
                w.dedent();
            } else {
                w.write(" ");
                render_term(body, w, PREC_ARROW);
            }
        }

        TargetTerm::Match { scrutinee, annot, arms } => {
            w.write(&format!("match {scrutinee}"));
            if let Some(annot) = annot {
                w.write(&format!(" in {} {} return ", annot.inductive, annot.binder));
                render_type(&annot.ret, w, PREC_APP);
            }
            w.line(" with");
            for arm in arms {
                render_arm(arm, w);
            }
            w.write("end");
        }
    }
    if parens {
        w.write(")");
    }
}

fn render_arm<W: Write>(arm: &MatchArm, w: &mut VernacWriter<W>) {
    w.write(&format!("| {}", arm.ctor));
    for binder in &arm.binders {
        w.write(&format!(" {binder}"));
    }
    w.write(" => ");
    render_term(&arm.body, w, PREC_ARROW);
    w.newline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Ctor, MatchAnnot};

    fn rendered(sentence: Sentence) -> String {
        render_to_string(|w| render_sentence(&sentence, w))
    }

    #[test]
    fn test_render_axiom_arrow() {
        let sentence = Sentence::Axiom {
            name: "len".to_string(),
            ty: TargetType::arrow(TargetType::reff("i63"), TargetType::reff("string")),
        };
        assert_eq!(rendered(sentence), "Axiom len : i63 -> string.\n");
    }

    #[test]
    fn test_render_axiom_forall_implicit() {
        let sentence = Sentence::Axiom {
            name: "io_pure".to_string(),
            ty: TargetType::forall(
                vec![Binder::implicit("a", TargetType::Sort)],
                TargetType::arrow(
                    TargetType::var("a"),
                    TargetType::app(TargetType::reff("IO"), vec![TargetType::var("a")]),
                ),
            ),
        };
        assert_eq!(
            rendered(sentence),
            "Axiom io_pure : forall {a : Type}, a -> IO a.\n"
        );
    }

    #[test]
    fn test_render_higher_order_domain_parenthesized() {
        let sentence = Sentence::Axiom {
            name: "iter".to_string(),
            ty: TargetType::arrow(
                TargetType::arrow(TargetType::reff("i63"), TargetType::reff("unit")),
                TargetType::arrow(
                    TargetType::app(TargetType::reff("list"), vec![TargetType::reff("i63")]),
                    TargetType::reff("unit"),
                ),
            ),
        };
        assert_eq!(
            rendered(sentence),
            "Axiom iter : (i63 -> unit) -> list i63 -> unit.\n"
        );
    }

    #[test]
    fn test_render_inductive() {
        let t_a = TargetType::app(TargetType::reff("t"), vec![TargetType::var("a")]);
        let sentence = Sentence::Inductive(Inductive {
            name: "t".to_string(),
            params: vec![Binder::explicit("a", TargetType::Sort)],
            arity: TargetType::Sort,
            ctors: vec![
                Ctor {
                    name: "Foo".to_string(),
                    ty: TargetType::arrow(TargetType::reff("i63"), t_a.clone()),
                },
                Ctor { name: "Bar".to_string(), ty: t_a },
            ],
        });
        assert_eq!(
            rendered(sentence),
            "Inductive t (a : Type) : Type :=\n| Foo : i63 -> t a\n| Bar : t a.\n"
        );
    }

    #[test]
    fn test_render_record() {
        let sentence = Sentence::Record(RecordDef {
            name: "point".to_string(),
            params: vec![],
            fields: vec![
                ("x".to_string(), TargetType::reff("i63")),
                ("y".to_string(), TargetType::reff("i63")),
            ],
        });
        assert_eq!(
            rendered(sentence),
            "Record point : Type := {\n  x : i63;\n  y : i63\n}.\n"
        );
    }

    #[test]
    fn test_render_type_abbreviation() {
        let sentence = Sentence::TypeAbbrev {
            name: "pair".to_string(),
            params: vec![Binder::explicit("a", TargetType::Sort)],
            body: TargetType::Prod(vec![TargetType::var("a"), TargetType::var("a")]),
        };
        assert_eq!(
            rendered(sentence),
            "Definition pair (a : Type) : Type := a * a.\n"
        );
    }

    #[test]
    fn test_render_smart_constructor() {
        let sentence = Sentence::Definition(Definition {
            name: "write_line".to_string(),
            binders: vec![
                Binder::implicit("m", TargetType::arrow(TargetType::Sort, TargetType::Sort)),
                Binder::Class(TargetType::app(
                    TargetType::reff("Inject"),
                    vec![TargetType::reff("CONSOLE"), TargetType::var("m")],
                )),
                Binder::explicit("x0", TargetType::reff("string")),
            ],
            ret: Some(TargetType::App(
                Box::new(TargetType::var("m")),
                vec![TargetType::reff("unit")],
            )),
            body: TargetTerm::app(
                TargetTerm::reff("inject"),
                vec![TargetTerm::app(
                    TargetTerm::reff("WriteLine"),
                    vec![TargetTerm::reff("x0")],
                )],
            ),
        });
        assert_eq!(
            rendered(sentence),
            "Definition write_line {m : Type -> Type} `{Inject CONSOLE m} (x0 : string) : \
             m unit := inject (WriteLine x0).\n"
        );
    }

    #[test]
    fn test_render_semantics_multiline() {
        let iface_a = TargetType::app(TargetType::reff("CONSOLE"), vec![TargetType::var("a")]);
        let sentence = Sentence::Definition(Definition {
            name: "CONSOLE_semantics".to_string(),
            binders: vec![],
            ret: Some(TargetType::app(
                TargetType::reff("semantics"),
                vec![TargetType::reff("CONSOLE")],
            )),
            body: TargetTerm::app(
                TargetTerm::reff("io_semantics"),
                vec![TargetTerm::Fun {
                    binders: vec![
                        Binder::explicit("a", TargetType::Sort),
                        Binder::explicit("e", iface_a),
                    ],
                    body: Box::new(TargetTerm::Match {
                        scrutinee: "e".to_string(),
                        annot: Some(MatchAnnot {
                            inductive: "CONSOLE".to_string(),
                            binder: "a".to_string(),
                            ret: TargetType::app(
                                TargetType::reff("IO"),
                                vec![TargetType::var("a")],
                            ),
                        }),
                        arms: vec![MatchArm {
                            ctor: "ReadLine".to_string(),
                            binders: vec!["x0".to_string()],
                            body: TargetTerm::app(
                                TargetTerm::reff("unsafe_read_line"),
                                vec![TargetTerm::reff("x0")],
                            ),
                        }],
                    }),
                }],
            ),
        });
        assert_eq!(
            rendered(sentence),
            "Definition CONSOLE_semantics : semantics CONSOLE :=\n  \
             io_semantics (fun (a : Type) (e : CONSOLE a) =>\n    \
             match e in CONSOLE a return IO a with\n    \
             | ReadLine x0 => unsafe_read_line x0\n    \
             end).\n"
        );
    }

    #[test]
    fn test_requires_stay_adjacent() {
        let text = render_sentences(&[
            Sentence::Comment("header".to_string()),
            Sentence::Require { module: "FfiRuntime.Prelude".to_string() },
            Sentence::Require { module: "Coqbase.Bytes".to_string() },
            Sentence::Axiom { name: "t".to_string(), ty: TargetType::Sort },
        ]);
        assert_eq!(
            text,
            "(* header *)\n\n\
             Require Import FfiRuntime.Prelude.\n\
             Require Import Coqbase.Bytes.\n\n\
             Axiom t : Type.\n"
        );
    }
}
