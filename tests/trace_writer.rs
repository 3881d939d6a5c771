//! End-to-end trace scenarios: runtime trace text resolved against C# source.
#![allow(clippy::missing_panics_doc, reason = "tests")]
#![allow(clippy::tests_outside_test_module, reason = "integration tests")]

use std::path::Path;

use stackref::csharp::load_source;
use stackref::fragments::{ResolvingSink, SymbolSink};
use stackref::model::{SemanticModel, SymbolKind};
use stackref::program::{ProgramModel, SymbolId};
use stackref::writer::{TraceSink, write};

/// Reassembles display text and records every method symbol it was handed.
#[derive(Default)]
struct Recorder {
    /// Qualified names of method symbols, in output order.
    methods: Vec<String>,
    /// Everything written, paths as `path:line`.
    text: String,
}

impl TraceSink for Recorder {
    fn write_path(&mut self, path: &str, line_number: u32) {
        self.text.push_str(&format!("{path}:{line_number}"));
    }

    fn write_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl SymbolSink<ProgramModel> for Recorder {
    fn write_symbol(&mut self, text: &str, symbol: &SymbolId, model: &ProgramModel) {
        if model.kind(symbol) == SymbolKind::Method {
            self.methods.push(model.qualified_name(*symbol));
        }
        self.text.push_str(text);
    }
}

/// Resolve `trace` against `source` and check the text and the methods hit.
fn assert_explains(source: &str, trace: &str, expected_text: &str, expected_methods: &[&str]) {
    let model = load_source("test", Path::new("Program.cs"), source).unwrap();
    let models = vec![model];
    let mut sink = ResolvingSink::new(&models, Recorder::default());
    write(trace, &mut sink);
    let recorder = sink.into_inner();
    assert_eq!(recorder.text, expected_text);
    assert_eq!(recorder.methods, expected_methods);
}

const MAIN: &str = "Program.Main";

#[test]
fn constructor() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        new Customer();
    }
}

public class Customer
{
    public Customer()
    {
        throw new Exception("Boom!");
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Customer..ctor()\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Customer.Customer()\n   at Program.Main()\n",
        &["Customer..ctor", MAIN],
    );
}

#[test]
fn method() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Test();
    }

    public static void Test()
    {
        throw new Exception("Boom!");
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.Test()\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.Test()\n   at Program.Main()\n",
        &["Program.Test", MAIN],
    );
}

#[test]
fn method_with_locations() {
    let source = "public static class Program\n{\n    public static void Main()\n    {\n        Test();\n    }\n\n    public static void Test() { }\n}\n";
    assert_explains(
        source,
        "System.Exception: Boom!\r\n   at Program.Test() in C:\\src\\Program.cs:line 8\r\n   at Program.Main() in C:\\src\\Program.cs:line 5\r\n",
        "System.Exception: Boom!\r\n   at Program.Test() in C:\\src\\Program.cs:8:line 8\r\n   at Program.Main() in C:\\src\\Program.cs:5:line 5\r\n",
        &["Program.Test", MAIN],
    );
}

#[test]
fn generic_method() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Test<float>(1.0f);
    }

    public static void Test<T>(T x)
    {
        throw new Exception("Boom!");
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.Test[T](T x)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.Test<T>(T)\n   at Program.Main()\n",
        &["Program.Test", MAIN],
    );
}

#[test]
fn generic_type() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        var g = new GenericType<int>();
        g.Test(2);
    }
}

class GenericType<T>
{
    public void Test(T value)
    {
        throw new Exception("Boom!");
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at GenericType`1.Test(T value)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at GenericType<T>.Test(T)\n   at Program.Main()\n",
        &["GenericType.Test", MAIN],
    );
}

#[test]
fn overloaded_method() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Test(2);
    }

    static void Test(int value)
    {
        throw new Exception("Boom!");
    }

    static void Test(float value)
    {
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.Test(Int32 value)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.Test(int)\n   at Program.Main()\n",
        &["Program.Test", MAIN],
    );
    assert_explains(
        source,
        "   at Program.Test(Single value)\n",
        "   at Program.Test(float)\n",
        &["Program.Test"],
    );
}

/// Source with one throwing `Test` whose parameter list is `parameters`.
fn single_parameter_program(parameters: &str) -> String {
    return format!(
        "using System;\nusing System.Collections.Generic;\n\nunsafe static class Program\n{{\n    public static void Main()\n    {{\n        Test(default);\n    }}\n\n    unsafe static void Test({parameters})\n    {{\n        throw new Exception(\"Boom!\");\n    }}\n}}\n"
    );
}

#[test]
fn argument_out() {
    assert_explains(
        &single_parameter_program("out int value"),
        "   at Program.Test(Int32& value)\n",
        "   at Program.Test(out int)\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_ref() {
    assert_explains(
        &single_parameter_program("ref int value"),
        "   at Program.Test(Int32& value)\n",
        "   at Program.Test(ref int)\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_array() {
    assert_explains(
        &single_parameter_program("int[] value"),
        "   at Program.Test(Int32[] value)\n",
        "   at Program.Test(int[])\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_params() {
    assert_explains(
        &single_parameter_program("params int[] value"),
        "   at Program.Test(Int32[] value)\n",
        "   at Program.Test(params int[])\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_generic_instance() {
    assert_explains(
        &single_parameter_program("IEnumerable<int> value"),
        "   at Program.Test(IEnumerable`1 value)\n",
        "   at Program.Test(IEnumerable<int>)\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_generic_instance_array() {
    assert_explains(
        &single_parameter_program("IEnumerable<int>[] value"),
        "   at Program.Test(IEnumerable`1[] value)\n",
        "   at Program.Test(IEnumerable<int>[])\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_pointer() {
    assert_explains(
        &single_parameter_program("int* value"),
        "   at Program.Test(Int32* value)\n",
        "   at Program.Test(int*)\n",
        &["Program.Test"],
    );
}

#[test]
fn argument_type_mismatch_stays_text() {
    let trace = "   at Program.Test(Int64 value)\n";
    assert_explains(&single_parameter_program("int value"), trace, trace, &[]);
}

#[test]
fn property_getter() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Console.WriteLine(X);
    }

    public static int X
    {
        get
        {
            throw new Exception("Boom!");
        }
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.get_X()\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.X.get\n   at Program.Main()\n",
        &["Program.get_X", MAIN],
    );
}

#[test]
fn property_setter() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        X = 10;
    }

    public static int X
    {
        get => 42;
        set
        {
            throw new Exception("Boom!");
        }
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.set_X(Int32 value)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.X.set\n   at Program.Main()\n",
        &["Program.set_X", MAIN],
    );
}

#[test]
fn event_adder() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Changed += null;
    }

    public static event EventHandler Changed
    {
        add
        {
            throw new Exception("Boom!");
        }
        remove { }
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.add_Changed(EventHandler value)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.Changed.add\n   at Program.Main()\n",
        &["Program.add_Changed", MAIN],
    );
}

#[test]
fn event_remover() {
    let source = r#"
using System;

public static class Program
{
    public static void Main()
    {
        Changed -= null;
    }

    public static event EventHandler Changed
    {
        add { }
        remove
        {
            throw new Exception("Boom!");
        }
    }
}
"#;
    assert_explains(
        source,
        "System.Exception: Boom!\n   at Program.remove_Changed(EventHandler value)\n   at Program.Main()\n",
        "System.Exception: Boom!\n   at Program.Changed.remove\n   at Program.Main()\n",
        &["Program.remove_Changed", MAIN],
    );
}

#[test]
fn namespaces_and_nested_types() {
    let source = r#"
namespace Acme.Orders
{
    public class Outer
    {
        public class Inner<T>
        {
            public void Run(string name) { }
        }
    }
}
"#;
    assert_explains(
        source,
        "   at Acme.Orders.Outer+Inner`1.Run(String name)\n",
        "   at Outer.Inner<T>.Run(string)\n",
        &["Acme.Orders.Outer.Inner.Run"],
    );
}

#[test]
fn later_models_are_searched() {
    let app = load_source("app", Path::new("App.cs"), "class App { static void Main() { } }").unwrap();
    let lib = load_source("lib", Path::new("Lib.cs"), "class Lib { void Work(int n) { } }").unwrap();
    let models = vec![app, lib];
    let mut sink = ResolvingSink::new(&models, Recorder::default());
    write("   at Lib.Work(Int32 n)\n   at App.Main()\n", &mut sink);
    let recorder = sink.into_inner();
    assert_eq!(recorder.text, "   at Lib.Work(int)\n   at App.Main()\n");
    assert_eq!(recorder.methods, vec!["Lib.Work", "App.Main"]);
}
