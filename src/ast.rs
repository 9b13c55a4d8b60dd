use std::rc::Rc;

use serde_json::json;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOp {
    /// The operator as it is written in source.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "inherit",
            BinaryOp::Sub => "plunder",
            BinaryOp::Mul => "forge",
            BinaryOp::Div => "cleave",
            BinaryOp::Mod => "shatter",
            BinaryOp::Concat => "unir",
            BinaryOp::Greater => ">",
            BinaryOp::Less => "<",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::LessEq => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "menos",
        }
    }
}

/// An ordered run of statements. Evaluating a block never opens a scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Node>,
}

impl Block {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A `decree` declaration. Shared as a value once registered in the global scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Value),
    Identifier(Rc<str>),
    Binary {
        left: Box<Node>,
        op: BinaryOp,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Assignment {
        name: Rc<str>,
        value: Box<Node>,
    },
    Print(Vec<Node>),
    If {
        condition: Box<Node>,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Box<Node>,
        body: Block,
    },
    For {
        init: Box<Node>,
        condition: Box<Node>,
        update: Box<Node>,
        body: Block,
    },
    FunctionDef(Rc<FunctionDef>),
    Call {
        name: Rc<str>,
        args: Vec<Node>,
    },
    Return(Option<Box<Node>>),
    Parias {
        name: Rc<str>,
    },
    Inquire {
        prompt: Box<Node>,
    },
    Conquistar {
        town: Box<Node>,
        army: Box<Node>,
        defense: Box<Node>,
    },
}

/// One entry of a node's children view.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Node(&'a Node),
    Block(&'static str, &'a Block),
}

impl Child<'_> {
    pub fn label(&self) -> String {
        match self {
            Child::Node(node) => node.label(),
            Child::Block(label, _) => label.to_string(),
        }
    }

    pub fn children(&self) -> Vec<Child<'_>> {
        match self {
            Child::Node(node) => node.children(),
            Child::Block(_, block) => block.statements.iter().map(Child::Node).collect(),
        }
    }
}

impl Node {
    pub fn label(&self) -> String {
        match self {
            Node::Literal(Value::Str(s)) => format!("Literal: {:?}", s.as_ref()),
            Node::Literal(value) => format!("Literal: {}", value),
            Node::Identifier(name) => format!("Identifier: {}", name),
            Node::Binary { op, .. } => format!("BinaryOp: {}", op.symbol()),
            Node::Unary { op, .. } => format!("UnaryOp: {}", op.symbol()),
            Node::Assignment { name, .. } => format!("Assignment: devote {}", name),
            Node::Print(_) => "Print".to_string(),
            Node::If { .. } => "If: judge".to_string(),
            Node::While { .. } => "While: vigil".to_string(),
            Node::For { .. } => "For: march".to_string(),
            Node::FunctionDef(def) => format!("FunctionDef: decree {}({})", def.name, def.params.join(", ")),
            Node::Call { name, .. } => format!("FunctionCall: {}", name),
            Node::Return(_) => "Return: yield".to_string(),
            Node::Parias { name } => format!("PariasCall: parias {}", name),
            Node::Inquire { .. } => "InputCall: inquire".to_string(),
            Node::Conquistar { .. } => "ConquistarCall: conquistar".to_string(),
        }
    }

    pub fn children(&self) -> Vec<Child<'_>> {
        match self {
            Node::Literal(_) | Node::Identifier(_) | Node::Parias { .. } => Vec::new(),
            Node::Binary { left, right, .. } => vec![Child::Node(left), Child::Node(right)],
            Node::Unary { operand, .. } => vec![Child::Node(operand)],
            Node::Assignment { value, .. } => vec![Child::Node(value)],
            Node::Print(args) | Node::Call { args, .. } => args.iter().map(Child::Node).collect(),
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![Child::Node(condition), Child::Block("Block", then_branch)];
                if let Some(else_branch) = else_branch {
                    children.push(Child::Block("Block: exile", else_branch));
                }
                children
            }
            Node::While { condition, body } => vec![Child::Node(condition), Child::Block("Block", body)],
            Node::For {
                init,
                condition,
                update,
                body,
            } => vec![
                Child::Node(init),
                Child::Node(condition),
                Child::Node(update),
                Child::Block("Block", body),
            ],
            Node::FunctionDef(def) => vec![Child::Block("Block", &def.body)],
            Node::Return(value) => value.iter().map(|v| Child::Node(v)).collect(),
            Node::Inquire { prompt } => vec![Child::Node(prompt)],
            Node::Conquistar { town, army, defense } => {
                vec![Child::Node(town), Child::Node(army), Child::Node(defense)]
            }
        }
    }
}

/// Renders a program as an indented box-drawing tree, one label per line.
pub fn render_tree(program: &Block) -> String {
    let root = Child::Block("Program", program);
    let mut output = format!("{}\n", root.label());
    render_children(&root, "", &mut output);
    output
}

fn render_children(item: &Child<'_>, prefix: &str, output: &mut String) {
    let children = item.children();
    let count = children.len();
    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", prefix, connector, child.label()));
        let extension = if last { "    " } else { "│   " };
        render_children(child, &format!("{}{}", prefix, extension), output);
    }
}

/// JSON form of the same tree: `{"label": ..., "children": [...]}`.
pub fn tree_to_json(program: &Block) -> serde_json::Value {
    child_to_json(&Child::Block("Program", program))
}

fn child_to_json(item: &Child<'_>) -> serde_json::Value {
    let children: Vec<serde_json::Value> = item.children().iter().map(child_to_json).collect();
    json!({
        "label": item.label(),
        "children": children,
    })
}
