//! Command line front end: compress a file, or restore it

#[macro_use]
extern crate log;

use std::{env, fs, process};
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use getopts::{Matches, Options};

use arith::block::{Decoder, Encoder};
use arith::entropy::{ari, bits::BitBuffer};
use arith::model::{adaptive, fixed, Model};

const EXTENSION: &str = ".ari";


#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Coder(#[from] arith::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    Uniform,
    Reference,
    Adaptive,
}

/// Everything the decoder has to know, stored in front of the coded bits
#[derive(Debug)]
struct Header {
    length      : u32,
    precision   : u8,
    kind        : Kind,
    range_clear : bool,
    update_range: u32,
}

impl Header {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.length)?;
        w.write_u8(self.precision)?;
        w.write_u8(match self.kind {
            Kind::Uniform => 0,
            Kind::Reference => 1,
            Kind::Adaptive => 2,
        })?;
        w.write_u8(self.range_clear as u8)?;
        w.write_u32::<LittleEndian>(self.update_range)
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Header> {
        let length = r.read_u32::<LittleEndian>()?;
        let precision = r.read_u8()?;
        let kind = match r.read_u8()? {
            0 => Kind::Uniform,
            1 => Kind::Reference,
            2 => Kind::Adaptive,
            other => return Err(io::Error::new(io::ErrorKind::InvalidData,
                format!("unknown model kind {}", other))),
        };
        let range_clear = r.read_u8()? != 0;
        let update_range = r.read_u32::<LittleEndian>()?;
        Ok(Header { length, precision, kind, range_clear, update_range })
    }
}


struct Config {
    precision   : u32,
    kind        : Kind,
    reference   : Vec<u8>,
    update_range: usize,
    range_clear : bool,
}

impl Config {
    fn from_matches(matches: &Matches) -> Result<Config, Failure> {
        let reference = match matches.opt_str("reference") {
            Some(path) => Some(fs::read(&path)?),
            None => None,
        };
        let kind = match matches.opt_str("model").as_deref() {
            None | Some("adaptive") => Kind::Adaptive,
            Some("fixed") if reference.is_some() => Kind::Reference,
            Some("fixed") => Kind::Uniform,
            Some(other) => return Err(Failure::Usage(format!("unknown model '{}'", other))),
        };
        Ok(Config {
            precision   : parse_opt(matches, "precision", ari::DEFAULT_PRECISION)?,
            kind,
            reference   : reference.unwrap_or_default(),
            update_range: parse_opt(matches, "update-range", adaptive::DEFAULT_UPDATE_RANGE)?,
            range_clear : !matches.opt_present("accumulate"),
        })
    }

    fn from_header(header: &Header, matches: &Matches) -> Result<Config, Failure> {
        let reference = match (header.kind, matches.opt_str("reference")) {
            (Kind::Reference, Some(path)) => fs::read(&path)?,
            (Kind::Reference, None) => return Err(Failure::Usage(
                "this file was coded with a reference sample, pass it with --reference".to_string())),
            _ => Vec::new(),
        };
        Ok(Config {
            precision   : header.precision as u32,
            kind        : header.kind,
            reference,
            update_range: header.update_range as usize,
            range_clear : header.range_clear,
        })
    }

    fn header(&self, length: u32) -> Result<Header, Failure> {
        let update_range = u32::try_from(self.update_range)
            .map_err(|_| Failure::Usage(format!("update range {} is too large", self.update_range)))?;
        Ok(Header {
            length,
            precision   : self.precision as u8,
            kind        : self.kind,
            range_clear : self.range_clear,
            update_range,
        })
    }

    fn model(&self) -> arith::Result<Box<dyn Model>> {
        Ok(match self.kind {
            Kind::Uniform => Box::new(fixed::Model::new_uniform(self.precision)?),
            Kind::Reference => Box::new(fixed::Model::new_sample(self.precision, &self.reference)?),
            Kind::Adaptive => Box::new(adaptive::Model::new(self.precision, self.update_range, self.range_clear)?),
        })
    }
}

fn parse_opt<T: std::str::FromStr>(matches: &Matches, name: &str, default: T) -> Result<T, Failure> {
    match matches.opt_str(name) {
        Some(text) => text.parse().map_err(|_| {
            Failure::Usage(format!("invalid value '{}' for --{}", text, name))
        }),
        None => Ok(default),
    }
}


fn compress(input_path: &str, output_path: &str, matches: &Matches) -> Result<(), Failure> {
    let config = Config::from_matches(matches)?;
    let input = fs::read(input_path)?;
    let length = u32::try_from(input.len())
        .map_err(|_| Failure::Usage(format!("{} is too large", input_path)))?;
    let model = config.model()?;
    if matches.opt_present("table") {
        print!("{}", model.frequencies());
    }
    info!("Encoding N: {}", length);
    let mut output = BitBuffer::new();
    let bits = Encoder::new(model).encode(&input, &mut output)?;

    if matches.opt_present("check") {
        let mut decoded = vec![0u8; input.len()];
        Decoder::new(config.model()?).decode(output.as_bytes(), &mut decoded)?;
        if decoded != input {
            let at = decoded.iter().zip(input.iter()).take_while(|&(a, b)| a == b).count();
            return Err(Failure::Usage(format!("round trip mismatch at byte {}", at)));
        }
        info!("Round trip verified");
    }

    let header = config.header(length)?;
    let mut file = io::BufWriter::new(fs::File::create(output_path)?);
    header.write(&mut file)?;
    file.write_all(output.as_bytes())?;
    file.flush()?;

    let ratio = output.bytes_len() as f64 / input.len().max(1) as f64 * 100.0;
    println!("{} -> {}: {} bytes coded in {} bits, ratio {:.3}%",
        input_path, output_path, input.len(), bits, ratio);
    Ok(())
}

fn decompress(input_path: &str, output_path: &str, matches: &Matches) -> Result<(), Failure> {
    let mut file = io::BufReader::new(fs::File::open(input_path)?);
    let header = Header::read(&mut file)?;
    debug!("{:?}", header);
    let mut code = Vec::new();
    file.read_to_end(&mut code)?;
    let config = Config::from_header(&header, matches)?;
    let model = config.model()?;
    if matches.opt_present("table") {
        print!("{}", model.frequencies());
    }
    info!("Decoding N: {}", header.length);
    let mut output = vec![0u8; header.length as usize];
    Decoder::new(model).decode(&code, &mut output)?;
    fs::write(output_path, &output)?;
    println!("{} -> {}: {} bytes restored", input_path, output_path, output.len());
    Ok(())
}


fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] input_file[{}]", program, EXTENSION);
    print!("{}", opts.usage(&brief));
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("d", "decode", "restore a coded file");
    opts.optopt("m", "model", "probability model: fixed or adaptive (default)", "MODEL");
    opts.optopt("r", "reference", "reference sample for the fixed model", "FILE");
    opts.optopt("u", "update-range", "symbols between adaptive table rebuilds (default 128)", "N");
    opts.optflag("a", "accumulate",
        "keep the adaptive counts across rebuilds, long inputs need a higher precision");
    opts.optopt("p", "precision", "fixed-point precision in bits (default 16)", "BITS");
    opts.optopt("o", "output", "output file", "FILE");
    opts.optflag("", "check", "decode after encoding and compare");
    opts.optflag("t", "table", "print the initial probability table");
    opts.optflag("h", "help", "print this help");
    opts
}

/// Program entry point
pub fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "arith".to_string());

    let opts = options();
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            print_usage(&program, &opts);
            process::exit(2);
        }
    };
    let input_path = match matches.free.first() {
        Some(path) if !matches.opt_present("h") => path.clone(),
        _ => {
            print_usage(&program, &opts);
            return
        }
    };

    let decode = matches.opt_present("d") || input_path.ends_with(EXTENSION);
    let output_path = matches.opt_str("o").unwrap_or_else(|| {
        if decode {
            let stem = input_path.strip_suffix(EXTENSION).unwrap_or(&input_path);
            format!("{}.orig", stem)
        } else {
            format!("{}{}", input_path, EXTENSION)
        }
    });

    let result = if decode {
        decompress(&input_path, &output_path, &matches)
    } else {
        compress(&input_path, &output_path, &matches)
    };
    if let Err(e) = result {
        eprintln!("{}: {}", input_path, e);
        process::exit(1);
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let matches = options().parse(args).unwrap();
        Config::from_matches(&matches).unwrap()
    }

    #[test]
    fn adaptive_clears_by_default() {
        let default = config(&["input"]);
        assert_eq!(default.kind, Kind::Adaptive);
        assert!(default.range_clear);
        assert_eq!(default.update_range, adaptive::DEFAULT_UPDATE_RANGE);
        assert!(!config(&["-a", "input"]).range_clear);
    }

    #[test]
    fn default_config_codes_long_input() {
        let mut input = vec![b'a'; 70_000];
        input.push(b'b');
        let config = config(&["input"]);
        let mut output = BitBuffer::new();
        Encoder::new(config.model().unwrap()).encode(&input, &mut output).unwrap();
        let mut decoded = vec![0u8; input.len()];
        Decoder::new(config.model().unwrap()).decode(output.as_bytes(), &mut decoded).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn header_keeps_settings() {
        let header = config(&["-u", "300", "input"]).header(12).unwrap();
        let mut bytes = Vec::new();
        header.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 11);
        let read = Header::read(&mut &bytes[..]).unwrap();
        assert_eq!((read.length, read.kind, read.range_clear, read.update_range), (12, Kind::Adaptive, true, 300));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_update_range_is_refused() {
        let mut config = config(&["input"]);
        config.update_range = u32::MAX as usize + 1;
        assert!(matches!(config.header(0), Err(Failure::Usage(_))));
    }
}
