use std::rc::Rc;

use weft::{
    any, any_rune, between, digit, hex_digit, janus, lit, many, match_rune, opt, past, rune,
    seq, wrap, zom, Grammar, ReadError, Reader, Rule, Scanner,
};

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "until", "while",
];

/// A reader for Lua names: an identifier that is not a keyword.
fn name_reader() -> Rc<dyn Reader> {
    let ident = seq!(
        any!(between('a', 'z'), between('A', 'Z'), rune('_')),
        zom(any!(
            between('a', 'z'),
            between('A', 'Z'),
            between('0', '9'),
            rune('_')
        ))
    );
    wrap("Name", move |sca: &mut Scanner<'_>| {
        let m = sca.mark();
        ident.read(sca)?;
        if KEYWORDS.contains(&sca.since(m)) {
            sca.to_marker(m);
            return Err(sca.error_for("Name"));
        }
        Ok(())
    })
}

/// A short literal string enclosed in `q`, with backslash escapes.
fn quoted(q: char) -> Rc<dyn Reader> {
    seq!(
        rune(q),
        zom(any!(
            seq!(rune('\\'), match_rune("escaped", |_| true)),
            match_rune("string-rune", move |c| c != q && c != '\\' && c != '\n')
        )),
        rune(q)
    )
}

/// A grammar for a surface subset of Lua 5.4.
///
/// The implementation is based on https://www.lua.org/manual/5.4/manual.html#9,
/// reworked into ordered-choice shape: `prefixexp` is a primary expression
/// followed by index and call suffixes, so the grammar never re-enters
/// itself without consuming input. `var` and `functioncall` share the
/// `prefixexp` reader; distinguishing them syntactically is left to the
/// statement alternatives that use them.
pub struct LuaGrammar {
    pub name: Rule,
    pub numeral: Rule,
    pub literal_string: Rule,
    pub unop: Rule,
    pub binop: Rule,
    pub field_sep: Rule,
    pub field: Rule,
    pub field_list: Rule,
    pub table_constructor: Rule,
    pub par_list: Rule,
    pub func_body: Rule,
    pub function_def: Rule,
    pub args: Rule,
    pub function_call: Rule,
    pub prefix_exp: Rule,
    pub exp: Rule,
    pub exp_list: Rule,
    pub name_list: Rule,
    pub var: Rule,
    pub var_list: Rule,
    pub func_name: Rule,
    pub label: Rule,
    pub ret_stat: Rule,
    pub attrib: Rule,
    pub att_name_list: Rule,
    pub stat: Rule,
    pub block: Rule,
    pub chunk: Rule,
    pub ws: Rule,
}

/// Create a grammar that reads a Lua chunk.
pub fn lua() -> LuaGrammar {
    let g = LuaGrammar {
        name: Rule::named("Name"),
        numeral: Rule::named("Numeral"),
        literal_string: Rule::named("LiteralString"),
        unop: Rule::named("unop"),
        binop: Rule::named("binop"),
        field_sep: Rule::named("fieldsep"),
        field: Rule::named("field"),
        field_list: Rule::named("fieldlist"),
        table_constructor: Rule::named("tableconstructor"),
        par_list: Rule::named("parlist"),
        func_body: Rule::named("funcbody"),
        function_def: Rule::named("functiondef"),
        args: Rule::named("args"),
        function_call: Rule::named("functioncall"),
        prefix_exp: Rule::named("prefixexp"),
        exp: Rule::named("exp"),
        exp_list: Rule::named("explist"),
        name_list: Rule::named("namelist"),
        var: Rule::named("var"),
        var_list: Rule::named("varlist"),
        func_name: Rule::named("funcname"),
        label: Rule::named("label"),
        ret_stat: Rule::named("retstat"),
        attrib: Rule::named("attrib"),
        att_name_list: Rule::named("attnamelist"),
        stat: Rule::named("stat"),
        block: Rule::named("block"),
        chunk: Rule::named("chunk"),
        ws: Rule::named("ws"),
    };

    let comment = seq!(lit("--"), zom(match_rune("comment-rune", |c| c != '\n')));
    g.ws.set(zom(any!(any_rune(" \t\r\n"), comment)));

    g.name.set(name_reader());
    g.numeral.set(any!(
        seq!(rune('0'), any_rune("xX"), many(hex_digit())),
        seq!(
            many(digit()),
            opt(seq!(rune('.'), zom(digit()))),
            opt(seq!(any_rune("eE"), opt(any_rune("+-")), many(digit())))
        )
    ));

    let (level_begin, level_end) = janus("level", zom(rune('=')));
    let long_bracket = seq!(
        rune('['),
        level_begin,
        rune('['),
        past(seq!(rune(']'), level_end, rune(']')))
    );
    g.literal_string
        .set(any!(quoted('"'), quoted('\''), long_bracket));

    g.unop.set(any!(lit("-"), lit("not"), lit("#"), lit("~")));
    g.binop.set(any!(
        lit("//"),
        lit(">>"),
        lit("<<"),
        lit(".."),
        lit("<="),
        lit(">="),
        lit("=="),
        lit("~="),
        lit("+"),
        lit("-"),
        lit("*"),
        lit("/"),
        lit("^"),
        lit("%"),
        lit("&"),
        lit("~"),
        lit("|"),
        lit("<"),
        lit(">"),
        lit("and"),
        lit("or")
    ));
    g.field_sep.set(any_rune(",;"));

    g.field.set(any!(
        seq!(
            rune('['),
            &g.ws,
            &g.exp,
            &g.ws,
            rune(']'),
            &g.ws,
            rune('='),
            &g.ws,
            &g.exp
        ),
        seq!(&g.name, &g.ws, rune('='), &g.ws, &g.exp),
        &g.exp
    ));
    g.field_list.set(seq!(
        &g.field,
        zom(seq!(&g.ws, &g.field_sep, &g.ws, &g.field)),
        opt(seq!(&g.ws, &g.field_sep))
    ));
    g.table_constructor
        .set(seq!(rune('{'), &g.ws, opt(seq!(&g.field_list, &g.ws)), rune('}')));

    g.par_list.set(any!(
        seq!(&g.name_list, opt(seq!(&g.ws, rune(','), &g.ws, lit("...")))),
        lit("...")
    ));
    g.func_body.set(seq!(
        rune('('),
        &g.ws,
        opt(seq!(&g.par_list, &g.ws)),
        rune(')'),
        &g.block,
        &g.ws,
        lit("end")
    ));
    g.function_def.set(seq!(lit("function"), &g.ws, &g.func_body));

    g.args.set(any!(
        seq!(rune('('), &g.ws, opt(seq!(&g.exp_list, &g.ws)), rune(')')),
        &g.table_constructor,
        &g.literal_string
    ));

    // primary expression plus index and call suffixes
    let primary = any!(seq!(rune('('), &g.ws, &g.exp, &g.ws, rune(')')), &g.name);
    let suffix = any!(
        seq!(rune('['), &g.ws, &g.exp, &g.ws, rune(']')),
        seq!(rune('.'), &g.ws, &g.name),
        seq!(opt(seq!(rune(':'), &g.ws, &g.name, &g.ws)), &g.args)
    );
    g.prefix_exp.set(seq!(primary, zom(seq!(&g.ws, suffix))));
    g.var.set(&g.prefix_exp);
    g.function_call.set(&g.prefix_exp);

    let simple = any!(
        &g.numeral,
        &g.literal_string,
        lit("..."),
        &g.function_def,
        &g.table_constructor,
        &g.prefix_exp,
        lit("nil"),
        lit("false"),
        lit("true"),
        seq!(&g.unop, &g.ws, &g.exp)
    );
    g.exp.set(seq!(
        simple.clone(),
        zom(seq!(&g.ws, &g.binop, &g.ws, simple))
    ));
    g.exp_list
        .set(seq!(&g.exp, zom(seq!(&g.ws, rune(','), &g.ws, &g.exp))));
    g.name_list
        .set(seq!(&g.name, zom(seq!(&g.ws, rune(','), &g.ws, &g.name))));
    g.var_list
        .set(seq!(&g.var, zom(seq!(&g.ws, rune(','), &g.ws, &g.var))));
    g.func_name.set(seq!(
        &g.name,
        zom(seq!(&g.ws, rune('.'), &g.ws, &g.name)),
        opt(seq!(&g.ws, rune(':'), &g.ws, &g.name))
    ));
    g.label.set(seq!(lit("::"), &g.ws, &g.name, &g.ws, lit("::")));
    g.ret_stat.set(seq!(
        lit("return"),
        opt(seq!(&g.ws, &g.exp_list)),
        opt(seq!(&g.ws, rune(';')))
    ));
    g.attrib
        .set(opt(seq!(&g.ws, rune('<'), &g.ws, &g.name, &g.ws, rune('>'))));
    g.att_name_list.set(seq!(
        &g.name,
        &g.attrib,
        zom(seq!(&g.ws, rune(','), &g.ws, &g.name, &g.attrib))
    ));

    g.stat.set(any!(
        rune(';'),
        seq!(&g.var_list, &g.ws, rune('='), &g.ws, &g.exp_list),
        &g.function_call,
        &g.label,
        lit("break"),
        seq!(lit("goto"), &g.ws, &g.name),
        seq!(lit("do"), &g.block, &g.ws, lit("end")),
        seq!(
            lit("while"),
            &g.ws,
            &g.exp,
            &g.ws,
            lit("do"),
            &g.block,
            &g.ws,
            lit("end")
        ),
        seq!(lit("repeat"), &g.block, &g.ws, lit("until"), &g.ws, &g.exp),
        seq!(
            lit("if"),
            &g.ws,
            &g.exp,
            &g.ws,
            lit("then"),
            &g.block,
            zom(seq!(
                &g.ws,
                lit("elseif"),
                &g.ws,
                &g.exp,
                &g.ws,
                lit("then"),
                &g.block
            )),
            opt(seq!(&g.ws, lit("else"), &g.block)),
            &g.ws,
            lit("end")
        ),
        seq!(
            lit("for"),
            &g.ws,
            &g.name,
            &g.ws,
            rune('='),
            &g.ws,
            &g.exp,
            &g.ws,
            rune(','),
            &g.ws,
            &g.exp,
            opt(seq!(&g.ws, rune(','), &g.ws, &g.exp)),
            &g.ws,
            lit("do"),
            &g.block,
            &g.ws,
            lit("end")
        ),
        seq!(
            lit("for"),
            &g.ws,
            &g.name_list,
            &g.ws,
            lit("in"),
            &g.ws,
            &g.exp_list,
            &g.ws,
            lit("do"),
            &g.block,
            &g.ws,
            lit("end")
        ),
        seq!(lit("function"), &g.ws, &g.func_name, &g.ws, &g.func_body),
        seq!(
            lit("local"),
            &g.ws,
            lit("function"),
            &g.ws,
            &g.name,
            &g.ws,
            &g.func_body
        ),
        seq!(
            lit("local"),
            &g.ws,
            &g.att_name_list,
            opt(seq!(&g.ws, rune('='), &g.ws, &g.exp_list))
        )
    ));
    g.block.set(seq!(
        zom(seq!(&g.ws, &g.stat)),
        opt(seq!(&g.ws, &g.ret_stat))
    ));
    g.chunk.set(seq!(&g.block, &g.ws));

    g
}

impl Reader for LuaGrammar {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        self.chunk.read(sca)
    }

    fn what(&self) -> String {
        "lua".to_string()
    }
}

impl Grammar for LuaGrammar {
    fn rules(&self) -> Vec<Rule> {
        vec![
            self.name.clone(),
            self.numeral.clone(),
            self.literal_string.clone(),
            self.unop.clone(),
            self.binop.clone(),
            self.field_sep.clone(),
            self.field.clone(),
            self.field_list.clone(),
            self.table_constructor.clone(),
            self.par_list.clone(),
            self.func_body.clone(),
            self.function_def.clone(),
            self.args.clone(),
            self.function_call.clone(),
            self.prefix_exp.clone(),
            self.exp.clone(),
            self.exp_list.clone(),
            self.name_list.clone(),
            self.var.clone(),
            self.var_list.clone(),
            self.func_name.clone(),
            self.label.clone(),
            self.ret_stat.clone(),
            self.attrib.clone(),
            self.att_name_list.clone(),
            self.stat.clone(),
            self.block.clone(),
            self.chunk.clone(),
            self.ws.clone(),
        ]
    }
}
