//! Renaming behavior on small hand-written functions.

use rename_buffers::error::{LexErrorKind, WarningKind};
use rename_buffers::{KnownTypes, RenameOptions, ScopeId, rename, rename_with};

fn renamed(src: &str) -> String {
    rename(src, &KnownTypes::standard())
        .expect("source should lex")
        .output
}

#[test]
fn non_pointer_locals_are_untouched() {
    let src = "int f(void) {\n\tint n = 0;\n\tchar c;\n\tsize_t len;\n\treturn n + c + len;\n}\n";

    assert_eq!(renamed(src), src);
}

#[test]
fn numbering_follows_first_declaration() {
    let src = "void f(void) { char *z; { void *a; } int *m; }";

    assert_eq!(
        renamed(src),
        "void f(void) { char *buffer1; { void *buffer2; } int *buffer3; }"
    );
}

#[test]
fn shadowed_pointer_gets_its_own_name() {
    let src = "void f(void) {\n  char *s = a;\n  {\n    char *s = b;\n    use(s);\n  }\n  use(s);\n}\n";

    assert_eq!(
        renamed(src),
        "void f(void) {\n  char *buffer1 = a;\n  {\n    char *buffer2 = b;\n    use(buffer2);\n  }\n  use(buffer1);\n}\n"
    );
}

#[test]
fn non_pointer_shadow_hides_outer_pointer() {
    let src = "void f(void) { char *s; { int s; s = 1; } s = 0; }";

    assert_eq!(
        renamed(src),
        "void f(void) { char *buffer1; { int s; s = 1; } buffer1 = 0; }"
    );
}

#[test]
fn member_names_are_never_renamed() {
    let src = "void f(struct conn *c) { char *buf; buf = c->buf; c->buf = s.buf; }";

    assert_eq!(
        renamed(src),
        "void f(struct conn *c) { char *buffer1; buffer1 = c->buf; c->buf = s.buf; }"
    );
}

#[test]
fn called_names_are_never_renamed() {
    let src = "void f(void) { char *dup; dup = dup(x); }";

    assert_eq!(renamed(src), "void f(void) { char *buffer1; buffer1 = dup(x); }");
}

#[test]
fn comments_strings_and_directives_are_preserved() {
    let src = "void f(void) {\n  char *p; /* p is here */\n#define P p\n  p = \"p {\"; // p\n  c = 'p';\n}\n";

    assert_eq!(
        renamed(src),
        "void f(void) {\n  char *buffer1; /* p is here */\n#define P p\n  buffer1 = \"p {\"; // p\n  c = 'p';\n}\n"
    );
}

#[test]
fn multiple_declarators_in_one_statement() {
    let src = "void f(void) { char *a, b, **c = 0, d[4]; }";

    assert_eq!(
        renamed(src),
        "void f(void) { char *buffer1, b, **buffer2 = 0, d[4]; }"
    );
}

#[test]
fn for_loop_declaration_is_scoped_to_the_loop() {
    let src = "void f(void) { char *p; for (char *p = s; *p; p++) { *p = 0; } p = 0; }";

    assert_eq!(
        renamed(src),
        "void f(void) { char *buffer1; for (char *buffer2 = s; *buffer2; buffer2++) { *buffer2 = 0; } buffer1 = 0; }"
    );
}

#[test]
fn ambiguous_statement_is_left_alone_and_reported() {
    let src = "void f(void) { char *p; foo_t *q; p = 0; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(result.output, "void f(void) { char *buffer1; foo_t *q; buffer1 = 0; }");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::ParseAmbiguity);
    assert_eq!(result.warnings[0].offset, src.find("foo_t").expect("present"));
}

#[test]
fn known_type_resolves_the_ambiguity() {
    let mut known = KnownTypes::new();
    known.insert("foo_t");

    let result = rename("void f(void) { foo_t *q; q = 0; }", &known).expect("source should lex");

    assert_eq!(result.output, "void f(void) { foo_t *buffer1; buffer1 = 0; }");
    assert!(result.warnings.is_empty());
}

#[test]
fn redeclaration_keeps_first_binding() {
    let src = "void f(void) { char *p; char *p; p = 0; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(result.output, "void f(void) { char *buffer1; char *p; buffer1 = 0; }");
    assert_eq!(result.warnings[0].kind, WarningKind::Redeclaration);
}

#[test]
fn unterminated_comment_is_fatal() {
    let err = rename("void f(void) { char *p; /* oops }", &KnownTypes::new())
        .expect_err("unterminated comment should fail");

    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
    assert_eq!((err.line, err.col), (1, 25));
}

#[test]
fn parameters_renamed_only_when_enabled() {
    let src = "int f(char *in, int n) { char *out = in; return n; }";
    let options = RenameOptions {
        parameters: true,
        ..RenameOptions::default()
    };

    assert_eq!(
        renamed(src),
        "int f(char *in, int n) { char *buffer1 = in; return n; }"
    );
    assert_eq!(
        rename_with(src, &KnownTypes::new(), &options)
            .expect("source should lex")
            .output,
        "int f(char *buffer1, int n) { char *buffer2 = buffer1; return n; }"
    );
}

#[test]
fn arrays_renamed_only_when_enabled() {
    let src = "void f(void) { char name[16]; char *p = name; }";
    let options = RenameOptions {
        arrays: true,
        ..RenameOptions::default()
    };

    assert_eq!(renamed(src), "void f(void) { char name[16]; char *buffer1 = name; }");
    assert_eq!(
        rename_with(src, &KnownTypes::new(), &options)
            .expect("source should lex")
            .output,
        "void f(void) { char buffer1[16]; char *buffer2 = buffer1; }"
    );
}

#[test]
fn local_typedef_enables_declarations() {
    let src = "void f(void) { typedef struct node node_t; node_t *n; n = 0; }";

    assert_eq!(
        renamed(src),
        "void f(void) { typedef struct node node_t; node_t *buffer1; buffer1 = 0; }"
    );
}

#[test]
fn next_index_threads_numbering_between_functions() {
    let known = KnownTypes::new();
    let first = rename("void f(void) { char *a; char *b; }", &known).expect("source should lex");
    let options = RenameOptions {
        first_index: first.next_index,
        ..RenameOptions::default()
    };
    let second =
        rename_with("void g(void) { char *c; }", &known, &options).expect("source should lex");

    assert_eq!(second.output, "void g(void) { char *buffer3; }");
    assert_eq!(second.next_index, 4);
}

#[test]
fn mapping_records_scopes() {
    let result = rename("void f(void) { char *a; { char *b; } }", &KnownTypes::new())
        .expect("source should lex");

    assert_eq!(result.mapping[0].scope, ScopeId::ROOT);
    assert_ne!(result.mapping[1].scope, ScopeId::ROOT);
}

#[test]
fn labels_and_goto_are_not_renamed() {
    let src = "void f(void) { char *p; goto p; p: p = 0; }";

    assert_eq!(renamed(src), "void f(void) { char *buffer1; goto p; p: buffer1 = 0; }");
}

#[test]
fn loop_macro_bodies_are_scanned() {
    let src = "void f(void) { FOREACH(ht, key) { char *k = key; use(k); } }";

    assert_eq!(
        renamed(src),
        "void f(void) { FOREACH(ht, key) { char *buffer1 = key; use(buffer1); } }"
    );
}

#[test]
fn ambiguous_for_initializer_shadows_outer_pointer() {
    let src = "void f(void) { char *p; for (foo_t *p = a; p; p++) { use(p); } p = 0; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(
        result.output,
        "void f(void) { char *buffer1; for (foo_t *p = a; p; p++) { use(p); } buffer1 = 0; }"
    );
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::ParseAmbiguity);
}

#[test]
fn skipped_declaration_still_shadows_outer_pointer() {
    let src = "void f(void) { char *p; { foo_t *p; p = 0; } p = 1; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(
        result.output,
        "void f(void) { char *buffer1; { foo_t *p; p = 0; } buffer1 = 1; }"
    );
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::ParseAmbiguity);
}

#[test]
fn qualified_unknown_type_is_a_declaration() {
    assert_eq!(
        rename("void f(void) { const foo_t *p; p = 0; }", &KnownTypes::new())
            .expect("source should lex")
            .output,
        "void f(void) { const foo_t *buffer1; buffer1 = 0; }"
    );
}

#[test]
fn tokens_after_body_are_left_alone() {
    let src = "void f(void) { char *p; p = 0; } p = 0;\n";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(result.output, "void f(void) { char *buffer1; buffer1 = 0; } p = 0;\n");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::UnsupportedConstruct);
}

#[test]
fn stray_paren_leaves_only_its_statement_alone() {
    let src = "void f(void) { char *p; p = x); p = 0; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(result.output, "void f(void) { char *buffer1; p = x); buffer1 = 0; }");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::ParseAmbiguity);
}

#[test]
fn bit_field_declarator_is_unsupported() {
    let src = "void f(void) { char *p; int n : 4; p = 0; }";
    let result = rename(src, &KnownTypes::new()).expect("source should lex");

    assert_eq!(result.output, "void f(void) { char *buffer1; int n : 4; buffer1 = 0; }");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::UnsupportedConstruct);
}
