use weft::{
    any, at, at_end, between, body_tail, janus, lit, many, named, opt, rune, seq, to, zom,
    Grammar, ReadError, Reader, Rule, Scanner,
};

/// A grammar for the MXT container format.
///
/// The implementation is based on https://mxt.aiq.dk/ — a file is a
/// sequence of chunks, each introduced by a `//` marker line that ends in a
/// `-->` arrow. The optional salt after the arrow is captured with a janus
/// pair: the marker that terminates the chunk content has to repeat it.
pub struct MxtGrammar {
    pub chunks: Rule,
    pub chunk: Rule,
    pub header: Rule,
    pub marker: Rule,
    pub next_marker: Rule,
    pub name: Rule,
    pub comment: Rule,
    pub arrow: Rule,
    pub salt: Rule,
    pub empty_content: Rule,
    pub content: Rule,
    pub word: Rule,
    pub word_char: Rule,
    pub nl: Rule,
}

/// Create a grammar that reads an MXT file.
pub fn mxt() -> MxtGrammar {
    let g = MxtGrammar {
        chunks: Rule::named("chunks"),
        chunk: Rule::named("chunk"),
        header: Rule::named("header"),
        marker: Rule::named("marker"),
        next_marker: Rule::named("next-marker"),
        name: Rule::named("name"),
        comment: Rule::named("comment"),
        arrow: Rule::named("arrow"),
        salt: Rule::named("salt"),
        empty_content: Rule::named("empty-content"),
        content: Rule::named("content"),
        word: Rule::named("word"),
        word_char: Rule::named("wordchar"),
        nl: Rule::named("nl"),
    };
    g.nl.set(weft::nl());
    g.word_char.set(between('\u{21}', char::MAX));
    g.word.set(many(&g.word_char));
    g.marker.set(seq!(lit("//"), zom(&g.word_char)));
    g.name.set(&g.word);

    let arrow = body_tail(zom(&g.word_char), lit("-->"));
    g.comment.set(to(named("arrow", arrow.clone())));
    g.arrow.set(arrow);

    let (salt_begin, salt_end) = janus("salt", opt(&g.word));
    g.salt
        .set(seq!(many(rune(' ')), salt_begin, zom(rune(' '))));
    g.header.set(seq!(
        &g.marker,
        many(rune(' ')),
        &g.name,
        &g.comment,
        &g.arrow,
        opt(&g.salt)
    ));
    g.next_marker.set(seq!(&g.nl, lit("//"), salt_end));
    g.empty_content.set(any!(at_end(), at(&g.next_marker)));
    g.content.set(to(any!(&g.next_marker, at_end())));
    g.chunk.set(seq!(
        &g.header,
        any!(&g.empty_content, seq!(&g.nl, &g.content))
    ));
    g.chunks
        .set(seq!(&g.chunk, zom(seq!(&g.nl, &g.chunk))));
    g
}

impl Reader for MxtGrammar {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        self.chunks.read(sca)
    }

    fn what(&self) -> String {
        "mxt".to_string()
    }
}

impl Grammar for MxtGrammar {
    fn rules(&self) -> Vec<Rule> {
        vec![
            self.chunks.clone(),
            self.chunk.clone(),
            self.header.clone(),
            self.marker.clone(),
            self.next_marker.clone(),
            self.name.clone(),
            self.comment.clone(),
            self.arrow.clone(),
            self.salt.clone(),
            self.empty_content.clone(),
            self.content.clone(),
            self.word.clone(),
            self.word_char.clone(),
            self.nl.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use weft::{check_rules, grammar_lines, INVALID_READER};

    #[test]
    fn grammar_is_valid() {
        let g = mxt();
        assert!(check_rules(&g).is_ok());
        for line in grammar_lines(&g) {
            assert!(!line.contains(INVALID_READER), "line {:?}", line);
        }
    }

    #[track_caller]
    fn check_names(inp: &str, exp: &[&str]) {
        let g = mxt();
        let names: Rc<RefCell<Vec<String>>> = Rc::default();
        let collected = names.clone();
        g.name
            .map(move |_, text| collected.borrow_mut().push(text.to_string()));

        let mut sca = Scanner::new(inp);
        assert!(sca.use_reader(&g).is_ok());
        assert!(sca.at_end(), "tail {:?}", sca.tail());
        assert_eq!(names.borrow().as_slice(), exp);
    }

    #[test]
    fn reads_a_bare_marker() {
        check_names("// name.of.chunk -->", &["name.of.chunk"]);
    }

    #[test]
    fn reads_salted_markers() {
        check_names(
            "//salt++++++++++++++++++++++++++ Σ-element ++++++++++++++++++++++++++++++++++-->",
            &["Σ-element"],
        );
    }

    #[test]
    fn reads_chunks_with_content() {
        let inp = "\
//---------------------------------------------------------------- user.json -->
{
    \"user\": \"alucard\",
    \"password\": \"C:SotN1997\"
}
//--------------------------------------------------------------- connection.ini
// comment line that is not part of the ini file,
// comment lines will be joined with a space character
//
// empty comment lines will generate a newline character in the comment
//----------------------------------------------------------------------------->
request: GET

[url]
schema=http
host=localhost
port=8080
path=/db/add
// user.pgp --> XYZ
-----BEGIN PGP MESSAGE-----

hQEMA8p144+Gi+YpAQf/VeFG9Zb+8w9aldWll8n2g3jqpE613LKg2XAJgwXQmSQL
uuTd
=WxK9
-----END PGP MESSAGE-----
//XYZ hello-world.h -->
//---------------------------------------------------------- hello-world.c --> X
// this is part of hello-world.c
#include<stdio.h>

int main(void) {
printf(\"Hello World\\n\");
return 0;
}";
        check_names(
            inp,
            &[
                "user.json",
                "connection.ini",
                "user.pgp",
                "hello-world.h",
                "hello-world.c",
            ],
        );
    }
}
