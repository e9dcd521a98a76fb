use clap::Parser;

/// This is a classroom seating chart and scoring program.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The roster of the class, as a .csv, .xlsx or .xls file. The first row must contain
    /// the columns 座號, 姓名, 組別 and 座位.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (text, optional) The name of the class. A single number such as 7 is rewritten to 7年班.
    /// If not provided, the name is guessed from the name of the input file.
    #[clap(long, value_parser)]
    pub class_name: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (SEAT=GRADE, repeatable) Sets the project grade of the student on a seat.
    /// The grade is one of 作品, A, B, C, D, E, 假. Example: --grade 2-3=B
    #[clap(long, value_parser)]
    pub grade: Vec<String>,

    /// (SEAT=MODIFIER, repeatable) Sets the project modifier of the student on a seat.
    /// The modifier is one of 無, +, -. Example: --modifier 2-3=+
    #[clap(long, value_parser)]
    pub modifier: Vec<String>,

    /// (SEAT=N, repeatable) Adds N bonus points (or removes them if N is negative) to the student
    /// on a seat. Example: --plus 2-3=2
    #[clap(long, value_parser)]
    pub plus: Vec<String>,

    /// (directory, optional) If specified, the scores are exported as an Excel file in this directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the seating chart and the summary are written in
    /// JSON format to the given location instead of being printed as text.
    #[clap(long, value_parser)]
    pub summary_json: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
